//! Live-preview channel.
//!
//! The console embeds the public site in a sandboxed frame and feeds it draft
//! content as the editor types. The frame announces itself with an explicit
//! `PREVIEW_READY` handshake; until then updates are dropped, not queued, and
//! the first delivered update after the handshake is a fresh read of the
//! current draft. Everything is origin-checked in both directions.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vitrine_core::content::ContentDraft;
use vitrine_core::reactive::{Dynamic, Subscription};
use vitrine_core::Result;

/// Wire messages between the console and the preview surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreviewMessage {
    /// The surface has loaded its receiver and can accept updates.
    #[serde(rename = "PREVIEW_READY")]
    Ready,
    /// Draft content for the surface to render.
    #[serde(rename = "PREVIEW_UPDATE")]
    Update {
        /// Current draft document
        data: ContentDraft,
        /// Section the edit touched, if the caller knows; lets the surface
        /// scroll to it
        #[serde(skip_serializing_if = "Option::is_none")]
        section: Option<String>,
    },
}

/// Transport to the embedded preview surface.
///
/// Implementors own the actual frame (or test double). The sandbox contract
/// is theirs: the surface must be same-origin with scripts enabled and
/// nothing else, and `post` must deliver only to `origin()`.
pub trait PreviewSurface: Send + Sync {
    /// Origin the surface is served from.
    fn origin(&self) -> &str;

    /// Deliver one message to the surface.
    fn post(&self, message: &PreviewMessage) -> Result<()>;
}

/// Origin-checked, readiness-gated channel to one preview surface.
pub struct LivePreviewChannel {
    surface: Arc<dyn PreviewSurface>,
    allowed_origin: String,
    ready: bool,
}

impl LivePreviewChannel {
    /// Bind a surface. The surface's origin must match `allowed_origin`
    /// exactly or every send is refused.
    pub fn new(surface: Arc<dyn PreviewSurface>, allowed_origin: impl Into<String>) -> Self {
        Self {
            surface,
            allowed_origin: allowed_origin.into(),
            ready: false,
        }
    }

    /// Whether the surface has completed the handshake.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Handle a message coming back from a surface claiming `origin`.
    ///
    /// Returns `true` when this was the handshake that flipped the channel
    /// ready (the caller should re-send current state). Messages from any
    /// other origin are ignored outright.
    pub fn handle_inbound(&mut self, origin: &str, message: &PreviewMessage) -> bool {
        if origin != self.allowed_origin {
            tracing::warn!(%origin, "ignoring preview message from unexpected origin");
            return false;
        }
        match message {
            PreviewMessage::Ready => {
                let was_ready = self.ready;
                self.ready = true;
                !was_ready
            }
            PreviewMessage::Update { .. } => false,
        }
    }

    /// Send a draft update. Dropped (returning `Ok(false)`) while the surface
    /// has not handshaken or sits on a different origin; `Ok(true)` when
    /// delivered.
    pub fn send_update(&self, data: ContentDraft, section: Option<String>) -> Result<bool> {
        if !self.ready {
            tracing::debug!("preview not ready; dropping update");
            return Ok(false);
        }
        if self.surface.origin() != self.allowed_origin {
            tracing::warn!(
                origin = %self.surface.origin(),
                "refusing to post preview update to unexpected origin"
            );
            return Ok(false);
        }
        self.surface
            .post(&PreviewMessage::Update { data, section })?;
        Ok(true)
    }
}

/// Couples the draft `Dynamic` to a preview channel.
///
/// The hosting shell drives it: [`pump`](Self::pump) from the editor loop
/// after draft mutations, [`on_inbound`](Self::on_inbound) from the frame's
/// message handler.
pub struct PreviewSync {
    draft: Subscription<ContentDraft>,
    channel: LivePreviewChannel,
    /// Section hint accompanying the next update
    section: Option<String>,
}

impl PreviewSync {
    /// Couple a draft handle to a channel.
    pub fn new(draft: &Dynamic<ContentDraft>, channel: LivePreviewChannel) -> Self {
        Self {
            draft: draft.subscribe(),
            channel,
            section: None,
        }
    }

    /// Set the section hint sent with subsequent updates.
    pub fn set_section(&mut self, section: Option<String>) {
        self.section = section;
    }

    /// Whether the surface has completed the handshake.
    pub fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }

    /// Forward the latest draft state if it changed since the last pump.
    pub fn pump(&mut self) -> Result<()> {
        if let Some(draft) = self.draft.poll() {
            self.channel.send_update(draft, self.section.clone())?;
        }
        Ok(())
    }

    /// Feed a message from the surface. On the readiness handshake the
    /// current draft state is sent immediately, so the surface's first
    /// delivered update is never stale.
    pub fn on_inbound(&mut self, origin: &str, message: &PreviewMessage) -> Result<()> {
        if self.channel.handle_inbound(origin, message) {
            // Mark the subscription caught-up; the fresh read below covers
            // anything written before the handshake.
            let _ = self.draft.poll();
            self.channel
                .send_update(self.draft.get(), self.section.clone())?;
        }
        Ok(())
    }
}
