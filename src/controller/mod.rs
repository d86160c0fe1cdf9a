pub mod admin;
pub mod deck;

use std::collections::VecDeque;

pub use admin::{
    AdminAction,
    AdminState,
};
pub use deck::DeckState;

use crate::{
    core::{
        tasks::{
            TaskManager,
            TaskResult,
        },
        Category,
        Session,
    },
    session::SessionController,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Study,
    Admin,
}

/// Coarse state of the whole window, derived from the session, the login prompt and the tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    AnonymousBrowsing,
    LoginPromptOpen,
    AuthenticatedStudy,
    AuthenticatedAdmin,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, title: String::new(), message: message.into() }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, title: title.into(), message: message.into() }
    }
}

pub struct RootController {
    tasks: TaskManager,
    session: SessionController,
    categories: Vec<Category>,
    categories_loading: bool,
    selected: Option<Category>,
    login: Option<LoginForm>,
    tab: Tab,
    deck: DeckState,
    admin: AdminState,
    notices: VecDeque<Notice>,
}

impl RootController {
    pub fn new(tasks: TaskManager) -> Self {
        Self {
            tasks,
            session: SessionController::new(),
            categories: Vec::new(),
            categories_loading: false,
            selected: None,
            login: None,
            tab: Tab::Study,
            deck: DeckState::default(),
            admin: AdminState::default(),
            notices: VecDeque::new(),
        }
    }

    /// Checks the session and asks for the category list.
    pub fn start(&mut self) {
        self.session.start(&self.tasks);
        self.refresh_categories();
    }

    pub fn set_repaint_hook(&mut self, hook: impl Fn() + Send + Sync + 'static) {
        self.tasks.set_repaint_hook(hook);
    }

    pub fn view_state(&self) -> ViewState {
        if self.session.is_admin() {
            match self.tab {
                Tab::Study => ViewState::AuthenticatedStudy,
                Tab::Admin => ViewState::AuthenticatedAdmin,
            }
        } else if self.login.is_some() {
            ViewState::LoginPromptOpen
        } else {
            ViewState::AnonymousBrowsing
        }
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_admin()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_loading(&self) -> bool {
        self.categories_loading
    }

    pub fn selected(&self) -> Option<&Category> {
        self.selected.as_ref()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn deck(&self) -> &DeckState {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut DeckState {
        &mut self.deck
    }

    pub fn admin(&self) -> &AdminState {
        &self.admin
    }

    pub fn login_form(&self) -> Option<&LoginForm> {
        self.login.as_ref()
    }

    pub fn login_form_mut(&mut self) -> Option<&mut LoginForm> {
        self.login.as_mut()
    }

    pub fn refresh_categories(&mut self) {
        self.categories_loading = true;
        self.tasks.fetch_categories();
    }

    pub fn select_category(&mut self, category: Category) {
        log::debug!("Selected category {} ({})", category.id, category.display_title());
        self.deck.load(&self.tasks, category.display_title());
        self.selected = Some(category);
        self.tab = Tab::Study;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.deck.clear();
    }

    pub fn request_login(&mut self) {
        if self.session.is_admin() {
            return;
        }
        if self.login.is_none() {
            self.login = Some(LoginForm::default());
        }
    }

    pub fn cancel_login(&mut self) {
        self.login = None;
    }

    pub fn submit_login(&mut self) {
        let Some(form) = self.login.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        if form.email.trim().is_empty() || form.password.is_empty() {
            form.error = Some("Introduce el correo y la contraseña".to_string());
            return;
        }

        form.error = None;
        form.submitting = true;
        self.session.login(&self.tasks, &form.email, &form.password);
    }

    pub fn logout(&mut self) {
        self.session.logout(&self.tasks);
        self.tab = Tab::Study;
        self.login = None;
        self.admin.reset();
    }

    /// Returns false when the admin tab is requested without a session.
    pub fn switch_tab(&mut self, tab: Tab) -> bool {
        if tab == Tab::Admin && !self.session.is_admin() {
            log::warn!("Admin tab requested without a session");
            return false;
        }
        self.tab = tab;
        true
    }

    pub fn apply_admin_action(&mut self, action: AdminAction) {
        if !self.session.is_admin() {
            log::warn!("Ignoring admin action without a session: {action:?}");
            return;
        }

        if action == AdminAction::Refresh {
            self.refresh_categories();
            self.deck.reload(&self.tasks);
            return;
        }

        self.admin.dispatch(&self.tasks, action);
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn poll(&mut self) {
        for result in self.tasks.poll_results() {
            self.handle_task_result(result);
        }
    }

    pub fn handle_task_result(&mut self, result: TaskResult) {
        log::trace!("Task result: {}", result.task_type());

        match result {
            TaskResult::CategoriesLoaded(categories) => self.apply_categories(categories),
            TaskResult::CurrentUser(user) => {
                self.session.apply_current_user(user);
                self.sync_with_session();
            }
            TaskResult::AuthStateChanged(event) => {
                self.session.apply_auth_event(&event);
                self.sync_with_session();
            }
            TaskResult::SignIn(Ok(())) => {
                log::info!("Signed in");
                self.login = None;
                self.notices.push_back(Notice::info("Sesión iniciada"));
            }
            TaskResult::SignIn(Err(message)) => {
                if let Some(form) = self.login.as_mut() {
                    form.submitting = false;
                }
                self.notices.push_back(Notice::error("Error de acceso", message));
            }
            TaskResult::SignOut(Ok(())) => log::info!("Signed out"),
            TaskResult::SignOut(Err(message)) => {
                log::warn!("Sign-out did not reach the server: {message}");
            }
            TaskResult::FlashcardsLoaded { category, result } => {
                self.deck.apply(&category, result);
            }
            TaskResult::DuplicatesFound(result) => {
                if let Some(message) = self.admin.apply_duplicates(result) {
                    self.notices.push_back(Notice::error("Error buscando duplicados", message));
                }
            }
            TaskResult::Mutation(result) => {
                self.admin.mutation_finished();
                match result {
                    Ok(outcome) => {
                        log::info!("{outcome}");
                        self.notices.push_back(Notice::info(outcome.to_string()));
                        self.refresh_categories();
                        self.deck.reload(&self.tasks);
                        if self.admin.duplicates().is_some() {
                            self.admin.dispatch(&self.tasks, AdminAction::FindDuplicates);
                        }
                    }
                    Err(message) => {
                        self.notices.push_back(Notice::error("Error al guardar", message));
                    }
                }
            }
        }
    }

    fn apply_categories(&mut self, categories: Vec<Category>) {
        self.categories_loading = false;
        self.categories = categories;

        let Some(selected) = &self.selected else {
            return;
        };
        match self.categories.iter().find(|c| c.id == selected.id) {
            Some(current) if current.display_title() != selected.display_title() => {
                let current = current.clone();
                self.deck.load(&self.tasks, current.display_title());
                self.selected = Some(current);
            }
            Some(_) => {}
            None => self.clear_selection(),
        }
    }

    fn sync_with_session(&mut self) {
        if self.session.is_admin() {
            self.login = None;
        } else {
            self.tab = Tab::Study;
            self.admin.reset();
        }
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        core::{
            CategoryDraft,
            FlashcardDraft,
        },
        remote::memory::MemoryService,
    };

    const EMAIL: &str = "admin@example.com";
    const PASSWORD: &str = "secret";

    fn controller(service: MemoryService) -> (RootController, Arc<MemoryService>) {
        let service = Arc::new(service.with_account(EMAIL, PASSWORD));
        let tasks = TaskManager::new(service.clone()).unwrap();
        (RootController::new(tasks), service)
    }

    fn settle(controller: &mut RootController, count: usize) {
        for result in controller.tasks.wait_for(count) {
            controller.handle_task_result(result);
        }
    }

    /// Startup yields the user lookup, the initial auth event and the categories.
    fn started(service: MemoryService) -> (RootController, Arc<MemoryService>) {
        let (mut controller, service) = controller(service);
        controller.start();
        settle(&mut controller, 3);
        (controller, service)
    }

    fn log_in(controller: &mut RootController) {
        controller.request_login();
        let form = controller.login_form_mut().unwrap();
        form.email = EMAIL.into();
        form.password = PASSWORD.into();
        controller.submit_login();
        settle(controller, 2);
    }

    #[test]
    fn test_startup_loads_sorted_categories_anonymously() {
        let (controller, service) = started(
            MemoryService::new()
                .with_category(1, Some("Animales"), true)
                .with_category(5, Some("Pista 2"), true)
                .with_category(3, Some("Pista 1"), true)
                .with_category(2, Some("Ñandú"), true),
        );

        let ids: Vec<i64> = controller.categories().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 5, 1, 2]);
        assert!(!controller.categories_loading());
        assert_eq!(controller.view_state(), ViewState::AnonymousBrowsing);
        assert_eq!(service.listener_count(), 1);
    }

    #[test]
    fn test_category_fetch_error_leaves_empty_list() {
        let (controller, _) =
            started(MemoryService::new().with_category(1, Some("Animales"), true).failing_reads());

        assert!(controller.categories().is_empty());
        assert!(!controller.categories_loading());
        assert_eq!(controller.view_state(), ViewState::AnonymousBrowsing);
    }

    #[test]
    fn test_login_prompt_can_be_cancelled() {
        let (mut controller, _) = started(MemoryService::new());

        controller.request_login();
        assert_eq!(controller.view_state(), ViewState::LoginPromptOpen);

        controller.cancel_login();
        assert_eq!(controller.view_state(), ViewState::AnonymousBrowsing);
    }

    #[test]
    fn test_empty_credentials_are_not_sent() {
        let (mut controller, _) = started(MemoryService::new());

        controller.request_login();
        controller.submit_login();

        let form = controller.login_form().unwrap();
        assert!(form.error.is_some());
        assert!(!form.submitting);
        assert_eq!(controller.view_state(), ViewState::LoginPromptOpen);
    }

    #[test]
    fn test_full_session_cycle() {
        let (mut controller, service) = started(MemoryService::new());

        log_in(&mut controller);
        assert_eq!(controller.view_state(), ViewState::AuthenticatedStudy);
        assert!(controller.login_form().is_none());
        assert_eq!(controller.take_notice().map(|n| n.kind), Some(NoticeKind::Info));

        assert!(controller.switch_tab(Tab::Admin));
        assert_eq!(controller.view_state(), ViewState::AuthenticatedAdmin);
        assert!(controller.switch_tab(Tab::Study));
        assert_eq!(controller.view_state(), ViewState::AuthenticatedStudy);
        controller.switch_tab(Tab::Admin);

        controller.logout();
        assert_eq!(controller.view_state(), ViewState::AnonymousBrowsing);
        assert_eq!(controller.tab(), Tab::Study);

        settle(&mut controller, 2);
        assert!(!controller.is_admin());

        controller.shutdown();
        assert_eq!(service.listener_count(), 0);
    }

    #[test]
    fn test_admin_tab_unreachable_anonymously() {
        let (mut controller, _) = started(MemoryService::new());

        assert!(!controller.switch_tab(Tab::Admin));
        assert_eq!(controller.tab(), Tab::Study);
        assert_eq!(controller.view_state(), ViewState::AnonymousBrowsing);
    }

    #[test]
    fn test_login_failure_keeps_prompt_and_reports() {
        let (mut controller, _) = started(MemoryService::new());

        controller.request_login();
        let form = controller.login_form_mut().unwrap();
        form.email = EMAIL.into();
        form.password = "wrong".into();
        controller.submit_login();
        settle(&mut controller, 1);

        assert_eq!(controller.view_state(), ViewState::LoginPromptOpen);
        assert!(!controller.login_form().unwrap().submitting);

        let notice = controller.take_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.contains("Invalid login credentials"));
    }

    #[test]
    fn test_remote_sign_out_notification_leaves_admin_tab() {
        let (mut controller, service) = started(MemoryService::new());
        log_in(&mut controller);
        controller.switch_tab(Tab::Admin);

        service.emit(crate::remote::AuthEvent::signed_out());
        settle(&mut controller, 1);

        assert_eq!(controller.view_state(), ViewState::AnonymousBrowsing);
        assert_eq!(controller.tab(), Tab::Study);
    }

    #[test]
    fn test_selecting_category_loads_its_cards() {
        let (mut controller, _) = started(
            MemoryService::new()
                .with_category(1, Some("Animales"), true)
                .with_flashcard(10, "perro", "كلب", "Animales")
                .with_flashcard(11, "libro", "كتاب", "Objetos"),
        );

        let category = controller.categories()[0].clone();
        controller.select_category(category);
        assert!(controller.deck().is_loading());
        settle(&mut controller, 1);

        let ids: Vec<i64> = controller.deck().cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![10]);
        assert!(!controller.deck().is_loading());

        controller.clear_selection();
        assert!(controller.selected().is_none());
        assert!(controller.deck().cards().is_empty());
    }

    #[test]
    fn test_stale_card_load_is_ignored() {
        let (mut controller, _) = started(
            MemoryService::new()
                .with_category(1, Some("Animales"), true)
                .with_category(2, Some("Objetos"), true)
                .with_flashcard(10, "perro", "كلب", "Animales")
                .with_flashcard(11, "libro", "كتاب", "Objetos"),
        );

        let animals = controller.categories()[0].clone();
        let objects = controller.categories()[1].clone();
        controller.select_category(animals);
        controller.select_category(objects);
        settle(&mut controller, 2);

        let ids: Vec<i64> = controller.deck().cards().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![11]);
        assert_eq!(controller.deck().category(), Some("Objetos"));
    }

    #[test]
    fn test_admin_actions_need_a_session() {
        let (mut controller, service) = started(MemoryService::new());

        controller.apply_admin_action(AdminAction::SaveCategory {
            id: None,
            draft: CategoryDraft { title: "Colores".into(), is_category: true },
        });

        assert!(!controller.admin().is_busy());
        assert!(service.categories().is_empty());
    }

    #[test]
    fn test_mutation_refreshes_category_list() {
        let (mut controller, _) = started(MemoryService::new().with_category(1, Some("Animales"), true));
        log_in(&mut controller);
        controller.take_notice();

        controller.apply_admin_action(AdminAction::SaveCategory {
            id: None,
            draft: CategoryDraft { title: "Colores".into(), is_category: true },
        });
        assert!(controller.admin().is_busy());

        settle(&mut controller, 1);
        assert!(!controller.admin().is_busy());
        assert!(controller.categories_loading());
        assert_eq!(controller.take_notice().map(|n| n.kind), Some(NoticeKind::Info));

        settle(&mut controller, 1);
        let titles: Vec<&str> = controller.categories().iter().map(|c| c.display_title()).collect();
        assert_eq!(titles, vec!["Animales", "Colores"]);
    }

    #[test]
    fn test_deleted_selection_is_cleared_on_refresh() {
        let (mut controller, _) = started(MemoryService::new().with_category(1, Some("Animales"), true));
        log_in(&mut controller);

        let category = controller.categories()[0].clone();
        controller.select_category(category);
        settle(&mut controller, 1);

        controller.apply_admin_action(AdminAction::DeleteCategory(1));
        // Mutation, then the refreshed categories and the reloaded deck.
        settle(&mut controller, 3);

        assert!(controller.categories().is_empty());
        assert!(controller.selected().is_none());
    }

    #[test]
    fn test_editing_a_duplicate_refreshes_the_groups() {
        let (mut controller, _) = started(
            MemoryService::new()
                .with_flashcard(1, "casa", "بيت", "Objetos")
                .with_flashcard(2, "hogar", "بيت", "Familia"),
        );
        log_in(&mut controller);

        controller.apply_admin_action(AdminAction::FindDuplicates);
        settle(&mut controller, 1);
        assert_eq!(controller.admin().duplicates().map(|groups| groups.len()), Some(1));

        controller.apply_admin_action(AdminAction::SaveCard {
            id: Some(2),
            draft: FlashcardDraft {
                spanish: "hogar".into(),
                arabic: "منزل".into(),
                phonetic: None,
                category: Some("Familia".into()),
            },
        });
        // Mutation, then the refreshed categories and the new duplicate search.
        settle(&mut controller, 3);

        assert_eq!(controller.admin().duplicates().map(|groups| groups.len()), Some(0));
        assert!(!controller.admin().duplicates_loading());
    }
}
