use crate::core::{
    duplicates::DuplicateGroup,
    tasks::TaskManager,
    CategoryDraft,
    FlashcardDraft,
};

/// Requests coming out of the admin tools (and the admin buttons on cards).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    SaveCategory { id: Option<i64>, draft: CategoryDraft },
    DeleteCategory(i64),
    SaveCard { id: Option<i64>, draft: FlashcardDraft },
    DeleteCard(i64),
    CleanNunation,
    FindDuplicates,
    KeepDuplicate { keep: i64, group: DuplicateGroup },
    Refresh,
}

#[derive(Debug, Default)]
pub struct AdminState {
    duplicates: Option<Vec<DuplicateGroup>>,
    duplicates_loading: bool,
    pending: usize,
}

impl AdminState {
    /// Sends the write for `action`. Returns false for actions that are not writes.
    pub fn dispatch(&mut self, tasks: &TaskManager, action: AdminAction) -> bool {
        match action {
            AdminAction::SaveCategory { id, draft } => tasks.save_category(id, draft),
            AdminAction::DeleteCategory(id) => tasks.delete_category(id),
            AdminAction::SaveCard { id, draft } => tasks.save_flashcard(id, draft),
            AdminAction::DeleteCard(id) => tasks.delete_flashcard(id),
            AdminAction::CleanNunation => tasks.clean_nunation(),
            AdminAction::KeepDuplicate { keep, group } => {
                if !group.contains(keep) {
                    log::warn!("Card {keep} is not part of the duplicate group {}", group.arabic);
                    return false;
                }
                tasks.resolve_duplicates(keep, group.ids_to_remove(keep));
            }
            AdminAction::FindDuplicates => {
                self.duplicates_loading = true;
                tasks.find_duplicates();
                return false;
            }
            AdminAction::Refresh => return false,
        }

        self.pending += 1;
        true
    }

    pub fn mutation_finished(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub fn apply_duplicates(&mut self, result: Result<Vec<DuplicateGroup>, String>) -> Option<String> {
        self.duplicates_loading = false;
        match result {
            Ok(groups) => {
                self.duplicates = Some(groups);
                None
            }
            Err(e) => Some(e),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    pub fn duplicates(&self) -> Option<&[DuplicateGroup]> {
        self.duplicates.as_deref()
    }

    pub fn duplicates_loading(&self) -> bool {
        self.duplicates_loading
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
