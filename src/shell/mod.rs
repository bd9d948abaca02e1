//! Application shell: the single owner of everything the window shows.
//!
//! Every mutation that changes what is visible (resize, color selection,
//! randomize) redraws the surface before returning.

use rand::Rng;

use crate::color::{random_corner_colors, Color, RandomColor};
use crate::error::AppResult;
use crate::export::{
    self, clamp_dimension, ExportArtifact, ExportRequest, ExportSettings, SizeMode,
    MAX_EXPORT_DIMENSION,
};
use crate::gradient::{self, CornerColors, GradientSpan};
use crate::picker::Corner;
use crate::screen::{ScreenSize, ScreenSizeError, ScreenSizeQuery};
use crate::state::{ShellEvent, ShellState, StateMachine, StateResult};
use crate::surface::{Surface, SurfaceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed,
    /// The export was cancelled or superseded while it was pending.
    Discarded,
}

#[derive(Debug)]
pub struct GradientShell {
    surface: Surface,
    colors: CornerColors,
    span: GradientSpan,
    size_mode: SizeMode,
    export_width: u32,
    export_height: u32,
    settings: ExportSettings,
    machine: StateMachine,
    artifact: Option<ExportArtifact>,
    pending_export: Option<u64>,
    next_export_id: u64,
}

impl GradientShell {
    pub fn new(colors: CornerColors, settings: ExportSettings) -> Self {
        Self {
            surface: Surface::default(),
            colors,
            span: GradientSpan::default(),
            size_mode: SizeMode::FollowDisplay,
            export_width: 0,
            export_height: 0,
            settings,
            machine: StateMachine::new(),
            artifact: None,
            pending_export: None,
            next_export_id: 1,
        }
    }

    pub fn with_span(mut self, span: GradientSpan) -> Self {
        self.span = span;
        self.redraw();
        self
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn colors(&self) -> &CornerColors {
        &self.colors
    }

    pub fn color(&self, corner: Corner) -> Color {
        self.colors[corner.index()]
    }

    pub fn state(&self) -> ShellState {
        self.machine.state()
    }

    pub fn export_modal_visible(&self) -> bool {
        self.state().export_modal_visible()
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    pub fn auto_size(&self) -> bool {
        self.size_mode == SizeMode::FollowDisplay
    }

    pub fn export_size(&self) -> (u32, u32) {
        (self.export_width, self.export_height)
    }

    pub fn settings(&self) -> ExportSettings {
        self.settings
    }

    pub fn artifact(&self) -> Option<&ExportArtifact> {
        self.artifact.as_ref()
    }

    pub fn data_url(&self) -> Option<&str> {
        self.artifact.as_ref().map(|artifact| artifact.data_url.as_str())
    }

    pub fn export_in_progress(&self) -> bool {
        self.pending_export.is_some()
    }

    pub fn redraw(&mut self) {
        gradient::render_with(&mut self.surface, &self.colors, self.span);
    }

    /// The displayed area changed size: match the surface to it and redraw.
    /// An unallocatable size leaves the surface and export size unchanged.
    pub fn handle_resize(
        &mut self,
        display_width: u32,
        display_height: u32,
    ) -> SurfaceResult<()> {
        self.surface.resize(display_width, display_height)?;
        if self.auto_size() {
            self.export_width = display_width.min(MAX_EXPORT_DIMENSION);
            self.export_height = display_height.min(MAX_EXPORT_DIMENSION);
        }
        tracing::debug!(
            display_width,
            display_height,
            auto_size = self.auto_size(),
            "surface resized"
        );
        self.redraw();
        Ok(())
    }

    /// Writes the chosen channels into the existing corner color.
    pub fn select_color(&mut self, corner: Corner, selection: Color) {
        self.colors[corner.index()].set(selection.r, selection.g, selection.b, selection.a);
        tracing::info!(corner = corner.label(), color = %selection, "corner color selected");
        self.redraw();
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, source: &RandomColor, rng: &mut R) {
        self.colors = random_corner_colors(source, rng);
        tracing::info!(
            colors = ?self.colors.map(|color| color.to_hex()),
            "randomized corner colors"
        );
        self.redraw();
    }

    pub fn open_export_modal(&mut self) -> StateResult<ShellState> {
        self.machine.transition(ShellEvent::OpenExport)
    }

    pub fn toggle_export_modal(&mut self) -> StateResult<ShellState> {
        self.machine.transition(ShellEvent::ToggleExport)
    }

    /// Clamped to `1..=MAX_EXPORT_DIMENSION`. Switches to an explicit size.
    pub fn set_export_width(&mut self, width: i64) {
        self.size_mode = SizeMode::Explicit;
        self.export_width = clamp_dimension(width);
    }

    /// Clamped to `1..=MAX_EXPORT_DIMENSION`. Switches to an explicit size.
    pub fn set_export_height(&mut self, height: i64) {
        self.size_mode = SizeMode::Explicit;
        self.export_height = clamp_dimension(height);
    }

    pub fn follow_display_size(&mut self) {
        self.size_mode = SizeMode::FollowDisplay;
        (self.export_width, self.export_height) = self.surface.size();
        self.artifact = None;
    }

    /// On failure nothing changes and the error is returned for display.
    pub fn follow_screen_size(
        &mut self,
        query: &dyn ScreenSizeQuery,
    ) -> Result<ScreenSize, ScreenSizeError> {
        let size = query.screen_size().inspect_err(|err| {
            tracing::warn!(%err, "screen size unavailable; export size unchanged");
        })?;
        self.size_mode = SizeMode::FollowScreen;
        self.export_width = size.width.min(MAX_EXPORT_DIMENSION);
        self.export_height = size.height.min(MAX_EXPORT_DIMENSION);
        self.artifact = None;
        tracing::info!(width = size.width, height = size.height, "export size follows screen");
        Ok(size)
    }

    /// Confirms the export dialog: drops any previous artifact and marks the
    /// export as pending. The caller runs `complete_export` after the
    /// feedback delay.
    pub fn begin_export(&mut self) -> StateResult<ExportRequest> {
        self.machine.transition(ShellEvent::ConfirmExport)?;
        self.artifact = None;

        let id = self.next_export_id;
        self.next_export_id += 1;
        self.pending_export = Some(id);

        let request = ExportRequest {
            id,
            width: self.export_width,
            height: self.export_height,
            settings: self.settings,
        };
        tracing::info!(
            export_id = id,
            width = request.width,
            height = request.height,
            "export confirmed"
        );
        Ok(request)
    }

    pub fn complete_export(&mut self, request: ExportRequest) -> AppResult<ExportOutcome> {
        if self.pending_export != Some(request.id) || self.state() != ShellState::Exporting {
            tracing::debug!(
                export_id = request.id,
                state = ?self.state(),
                "discarding stale export"
            );
            return Ok(ExportOutcome::Discarded);
        }

        let result = export::render_export(&mut self.surface, &self.colors, self.span, &request);
        self.pending_export = None;
        self.machine.transition(ShellEvent::FinishExport)?;

        self.artifact = Some(result?);
        Ok(ExportOutcome::Completed)
    }

    /// Closes the dialog and forgets the artifact; the live surface is untouched.
    pub fn cancel_export(&mut self) -> StateResult<ShellState> {
        self.artifact = None;
        self.pending_export = None;
        self.machine.transition(ShellEvent::CancelExport)
    }
}
