use gpui::{AppContext, Entity};
use seedlab_bridge::{
    analysis::{AnalysisEditorData, AnalysisKind},
    lote::LoteSimple,
};

/// Emitted when the backend rejected an expected-repetition count and the
/// editor should show the clamped value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedRepetitionsClamped(pub u32);

#[derive(Debug, Clone)]
pub struct AnalysisEntity {
    pub kind: AnalysisKind,
    /// Analysis id typed by the user or opened from a notification.
    pub requested_id: Option<i64>,
    pub eligible: Vec<LoteSimple>,
    pub editor: Option<AnalysisEditorData>,
    pub load_error: Option<String>,
}

impl Default for AnalysisEntity {
    fn default() -> Self {
        Self {
            kind: AnalysisKind::Germinacion,
            requested_id: None,
            eligible: Vec::new(),
            editor: None,
            load_error: None,
        }
    }
}

impl AnalysisEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, data: AnalysisEditorData, cx: &mut C) {
        entity.update(cx, |this, cx| {
            this.kind = data.kind();
            this.requested_id = Some(data.id());
            this.editor = Some(data);
            this.load_error = None;
            cx.notify();
        });
    }

    pub fn update_eligible<C: AppContext>(
        entity: &Entity<Self>,
        kind: AnalysisKind,
        lotes: Vec<LoteSimple>,
        cx: &mut C,
    ) {
        entity.update(cx, |this, cx| {
            if this.kind == kind {
                this.eligible = lotes;
                cx.notify();
            }
        });
    }

    pub fn clamp_expected<C: AppContext>(
        entity: &Entity<Self>,
        kind: AnalysisKind,
        id: i64,
        value: u32,
        cx: &mut C,
    ) {
        entity.update(cx, |this, cx| {
            let shown = this
                .editor
                .as_ref()
                .is_some_and(|editor| editor.kind() == kind && editor.id() == id);
            if shown {
                cx.emit(ExpectedRepetitionsClamped(value));
            }
        });
    }
}

impl gpui::EventEmitter<ExpectedRepetitionsClamped> for AnalysisEntity {}
