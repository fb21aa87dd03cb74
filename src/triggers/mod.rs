//! Trigger surface
//!
//! Where embedder-forwarded DOM events enter the router: click interception,
//! debounced hover prefetch, focus prefetch, viewport visibility, and
//! popstate routing. The surface decides dispositions; the navigation
//! service does the work.

mod events;
mod viewport;

pub use events::{ClickDisposition, LinkClick, Modifiers, MouseButton};
pub use viewport::ViewportTracker;

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::dom;
use crate::router::{NavigationOutcome, NavigationService, PopStateEvent};

/// Routes user interactions into the navigation service
pub struct TriggerSurface {
    service: Arc<NavigationService>,
    viewport: ViewportTracker,
    hover_task: Mutex<Option<JoinHandle<()>>>,
}

impl TriggerSurface {
    /// Create the surface for `service`
    pub fn new(service: Arc<NavigationService>) -> Self {
        Self {
            service,
            viewport: ViewportTracker::new(),
            hover_task: Mutex::new(None),
        }
    }

    /// Handle a click.
    ///
    /// Returns [`ClickDisposition::Handled`] when default navigation was
    /// prevented and the router serviced the click: a plain left-click, no
    /// modifiers, on an internal link that is neither a download nor a
    /// new-tab target. The disposition reflects the interception decision,
    /// not the navigation outcome (a dropped navigation was still handled).
    pub async fn handle_click(&self, click: LinkClick) -> ClickDisposition {
        if click.modifiers.any() || click.button != MouseButton::Left {
            return ClickDisposition::PassThrough;
        }
        let Some(href) = click.href else {
            return ClickDisposition::PassThrough;
        };
        if !self.service.classifier().is_internal(&href) {
            return ClickDisposition::PassThrough;
        }
        if click.download || click.target_blank {
            return ClickDisposition::PassThrough;
        }

        self.service.navigate(&href, true).await;
        ClickDisposition::Handled
    }

    /// Pointer moved over a link: debounced prefetch.
    /// A newer hover supersedes a still-pending one.
    pub fn handle_pointer_over(&self, href: &str) {
        let service = Arc::clone(&self.service);
        let href = href.to_owned();
        let debounce = self.service.config().hover_debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if service.classifier().is_internal(&href) {
                service.prefetch(&href).await;
            }
        });
        if let Ok(mut slot) = self.hover_task.lock() {
            if let Some(previous) = slot.replace(task) {
                previous.abort();
            }
        }
    }

    /// Keyboard focus landed on a link: immediate prefetch
    pub async fn handle_focus_in(&self, href: &str) {
        if self.service.classifier().is_internal(href) {
            self.service.prefetch(href).await;
        }
    }

    /// The embedder reports an observed link became visible
    pub async fn handle_link_visible(&self, href: &str) {
        if self.viewport.should_fire(href) && self.service.classifier().is_internal(href) {
            self.service.prefetch(href).await;
        }
    }

    /// Schedule the viewport scan per the platform strategy.
    /// Returns false when intersection observation is unsupported, in which
    /// case viewport prefetch stays off entirely.
    pub fn schedule_viewport_scan(self: &Arc<Self>) -> bool {
        let Some(delay) = self.service.scan_schedule().delay() else {
            return false;
        };
        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let count = this.viewport.scan(&dom::lock(this.service.document()));
            log::debug!("viewport scan registered {count} links");
        });
        true
    }

    /// Route a popstate event into the navigation service
    pub async fn handle_popstate(&self, event: PopStateEvent) -> NavigationOutcome {
        self.service.handle_popstate(event).await
    }

    /// The viewport-prefetch registry
    pub fn viewport(&self) -> &ViewportTracker {
        &self.viewport
    }
}
