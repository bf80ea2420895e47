use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::identity::events::UserRegisteredEvent;
use crate::identity::ports::EventPublisher;
use crate::identity::ports::FallbackNotifier;

/// How a registration event reached (or failed to reach) other services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Primary,
    Fallback { delivered: usize, failed: usize },
    Undelivered,
}

/// Best-effort fan-out of registration events.
///
/// The primary channel is tried once; only if it fails are the fallback
/// services called, concurrently and once each. Failures are logged and
/// never reach the caller.
pub struct RegistrationNotifier<EP>
where
    EP: EventPublisher,
{
    publisher: Arc<EP>,
    fallbacks: Arc<Vec<Arc<dyn FallbackNotifier>>>,
}

impl<EP> Clone for RegistrationNotifier<EP>
where
    EP: EventPublisher,
{
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
            fallbacks: Arc::clone(&self.fallbacks),
        }
    }
}

impl<EP> RegistrationNotifier<EP>
where
    EP: EventPublisher,
{
    pub fn new(publisher: Arc<EP>, fallbacks: Vec<Arc<dyn FallbackNotifier>>) -> Self {
        Self {
            publisher,
            fallbacks: Arc::new(fallbacks),
        }
    }

    /// Deliver `event` on a detached task.
    ///
    /// The task owns its copy of the event, so dropping the handle (or the
    /// request that triggered it) does not cancel delivery.
    pub fn dispatch(&self, event: UserRegisteredEvent) -> JoinHandle<Delivery> {
        let notifier = self.clone();
        tokio::spawn(async move { notifier.deliver(&event).await })
    }

    pub async fn deliver(&self, event: &UserRegisteredEvent) -> Delivery {
        let primary_error = match self.publisher.publish_user_registered(event).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %event.user_id,
                    routing_key = %event.routing_key(),
                    "Registration event published"
                );
                return Delivery::Primary;
            }
            Err(e) => e,
        };

        if self.fallbacks.is_empty() {
            tracing::error!(
                user_id = %event.user_id,
                error = %primary_error,
                "Registration event could not be published and no fallback is configured"
            );
            return Delivery::Undelivered;
        }

        tracing::warn!(
            user_id = %event.user_id,
            error = %primary_error,
            fallbacks = self.fallbacks.len(),
            "Registration event publish failed, notifying services directly"
        );

        let results = join_all(self.fallbacks.iter().map(|fallback| async move {
            let result = fallback.notify_user_registered(event).await;
            match &result {
                Ok(()) => tracing::info!(
                    user_id = %event.user_id,
                    service = fallback.name(),
                    "Registration delivered via fallback"
                ),
                Err(e) => tracing::error!(
                    user_id = %event.user_id,
                    service = fallback.name(),
                    error = %e,
                    "Fallback delivery failed"
                ),
            }
            result
        }))
        .await;

        let delivered = results.iter().filter(|result| result.is_ok()).count();
        let failed = results.len() - delivered;

        if delivered == 0 {
            Delivery::Undelivered
        } else {
            Delivery::Fallback { delivered, failed }
        }
    }
}
