use super::error::RenderError;
use super::texture::TextureId;

/// Attach and frame bookkeeping of a render context.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContextState {
    pub(crate) attached: bool,
    pub(crate) recording: bool,
}

impl ContextState {
    pub(crate) fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.recording {
            return Err(RenderError::FrameAlreadyActive);
        }
        self.recording = true;
        Ok(())
    }

    /// Ends the frame, detaching if needed. Returns whether it was still attached.
    pub(crate) fn finish_frame(&mut self) -> Result<bool, RenderError> {
        if !self.recording {
            return Err(RenderError::NoActiveFrame);
        }
        self.recording = false;
        Ok(std::mem::take(&mut self.attached))
    }

    pub(crate) fn attach(&mut self) -> Result<(), RenderError> {
        if self.attached {
            return Err(RenderError::AlreadyAttached);
        }
        self.attached = true;
        Ok(())
    }

    pub(crate) fn detach(&mut self) -> Result<(), RenderError> {
        if !self.attached {
            return Err(RenderError::NotAttached);
        }
        self.attached = false;
        Ok(())
    }

    pub(crate) fn check_draw(&self, has_brush: bool, has_pen: bool) -> Result<(), RenderError> {
        if !self.attached {
            return Err(RenderError::NotAttached);
        }
        if !has_brush && !has_pen {
            return Err(RenderError::NoBrushOrPen);
        }
        if !self.recording {
            return Err(RenderError::NoActiveFrame);
        }
        Ok(())
    }
}

/// Rejects sampling the texture currently drawn into.
pub(crate) fn check_sampling(
    target: Option<TextureId>,
    sampled: Option<TextureId>,
) -> Result<(), RenderError> {
    match (target, sampled) {
        (Some(target), Some(sampled)) if target == sampled => Err(RenderError::TargetBoundAsTexture),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached_frame() -> ContextState {
        ContextState {
            attached: true,
            recording: true,
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    #[test]
    fn frames_do_not_nest() {
        let mut state = ContextState::default();
        state.begin_frame().unwrap();
        assert_eq!(state.begin_frame(), Err(RenderError::FrameAlreadyActive));
        assert!(state.recording);
    }

    #[test]
    fn finish_without_frame_fails() {
        let mut state = ContextState::default();
        assert_eq!(state.finish_frame(), Err(RenderError::NoActiveFrame));
    }

    #[test]
    fn finish_detaches() {
        let mut state = attached_frame();
        assert_eq!(state.finish_frame(), Ok(true));
        assert_eq!(state, ContextState::default());

        state.begin_frame().unwrap();
        assert_eq!(state.finish_frame(), Ok(false));
    }

    // ── attach ────────────────────────────────────────────────────────────

    #[test]
    fn attach_twice_fails() {
        let mut state = ContextState::default();
        state.attach().unwrap();
        assert_eq!(state.attach(), Err(RenderError::AlreadyAttached));
        assert!(state.attached);
    }

    #[test]
    fn detach_without_attach_fails() {
        let mut state = ContextState::default();
        assert_eq!(state.detach(), Err(RenderError::NotAttached));

        state.attach().unwrap();
        state.detach().unwrap();
        assert_eq!(state.detach(), Err(RenderError::NotAttached));
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_needs_attach_first() {
        let state = ContextState {
            attached: false,
            recording: true,
        };
        assert_eq!(state.check_draw(true, false), Err(RenderError::NotAttached));
        // Attachment is reported before a missing brush and pen.
        assert_eq!(state.check_draw(false, false), Err(RenderError::NotAttached));
    }

    #[test]
    fn draw_needs_brush_or_pen() {
        let state = attached_frame();
        assert_eq!(state.check_draw(false, false), Err(RenderError::NoBrushOrPen));
        assert!(state.check_draw(true, false).is_ok());
        assert!(state.check_draw(false, true).is_ok());
        assert!(state.check_draw(true, true).is_ok());
    }

    #[test]
    fn draw_outside_frame_fails() {
        let mut state = ContextState::default();
        state.attach().unwrap();
        assert_eq!(state.check_draw(true, true), Err(RenderError::NoActiveFrame));
    }

    // ── sampling ──────────────────────────────────────────────────────────

    #[test]
    fn bound_target_cannot_be_sampled() {
        let target = TextureId::next();
        let other = TextureId::next();

        assert_eq!(
            check_sampling(Some(target), Some(target)),
            Err(RenderError::TargetBoundAsTexture)
        );
        assert!(check_sampling(Some(target), Some(other)).is_ok());
        assert!(check_sampling(None, Some(target)).is_ok());
        assert!(check_sampling(Some(target), None).is_ok());
    }
}
