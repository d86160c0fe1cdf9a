use std::{
    future::Future,
    sync::{
        mpsc,
        Arc,
    },
};

use futures::{
    stream,
    StreamExt,
    TryStreamExt,
};
use tokio::runtime::Runtime;

use super::{
    MutationOutcome,
    TaskResult,
};
use crate::{
    core::{
        arabic::NunationCleaner,
        category_order::sort_categories,
        duplicates::find_duplicates,
        CategoryDraft,
        FlashcardDraft,
        TarjetasError,
    },
    remote::{
        RemoteDataService,
        Subscription,
    },
};

/// Upper bound on writes in flight during bulk admin operations.
const WRITE_CONCURRENCY: usize = 8;

pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Delivers finished work back to the UI thread.
#[derive(Clone)]
struct Notifier {
    sender: mpsc::Sender<TaskResult>,
    repaint: Option<RepaintHook>,
}

impl Notifier {
    fn send(&self, result: TaskResult) {
        let task_type = result.task_type();
        log::debug!("Task finished: {task_type}");
        if self.sender.send(result).is_err() {
            log::debug!("Dropped {task_type} result, the task manager is gone");
        }
        if let Some(repaint) = &self.repaint {
            repaint();
        }
    }
}

/// Runs remote calls on a tokio runtime; results are collected with [`TaskManager::poll_results`].
pub struct TaskManager {
    runtime: Arc<Runtime>,
    service: Arc<dyn RemoteDataService>,
    receiver: mpsc::Receiver<TaskResult>,
    notifier: Notifier,
}

impl TaskManager {
    pub fn new(service: Arc<dyn RemoteDataService>) -> Result<Self, TarjetasError> {
        let runtime = Arc::new(Runtime::new()?);

        let (sender, receiver) = mpsc::channel();

        Ok(Self { runtime, service, receiver, notifier: Notifier { sender, repaint: None } })
    }

    /// Called after every delivered result, typically to wake the UI.
    pub fn set_repaint_hook(&mut self, hook: impl Fn() + Send + Sync + 'static) {
        self.notifier.repaint = Some(Arc::new(hook));
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (Arc<dyn RemoteDataService>, Notifier) {
        (Arc::clone(&self.service), self.notifier.clone())
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let notifier = self.notifier.clone();
        self.runtime.spawn(async move {
            notifier.send(task.await);
        });
    }

    pub fn fetch_categories(&self) {
        let (service, _) = self.task_context();

        self.spawn(async move {
            let categories = match service.fetch_categories().await {
                Ok(categories) => sort_categories(&categories),
                Err(e) => {
                    log::error!("Error loading categories: {e}");
                    Vec::new()
                }
            };
            TaskResult::CategoriesLoaded(categories)
        });
    }

    pub fn fetch_current_user(&self) {
        let (service, _) = self.task_context();

        self.spawn(async move {
            let user = service.current_user().await.unwrap_or_else(|e| {
                log::error!("Error checking the current user: {e}");
                None
            });
            TaskResult::CurrentUser(user)
        });
    }

    /// Forwards every auth change into the result stream until the handle is dropped.
    pub fn subscribe_auth_changes(&self) -> Subscription {
        let (service, notifier) = self.task_context();

        service.on_auth_state_change(Box::new(move |event| {
            notifier.send(TaskResult::AuthStateChanged(event));
        }))
    }

    pub fn sign_in(&self, email: String, password: String) {
        let (service, _) = self.task_context();

        self.spawn(async move {
            let result = service
                .sign_in_with_password(&email, &password)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string());
            TaskResult::SignIn(result)
        });
    }

    pub fn sign_out(&self) {
        let (service, _) = self.task_context();

        self.spawn(async move {
            let result = service.sign_out().await.map_err(|e| {
                log::error!("Sign-out failed: {e}");
                e.to_string()
            });
            TaskResult::SignOut(result)
        });
    }

    pub fn load_flashcards(&self, category: String) {
        let (service, _) = self.task_context();

        self.spawn(async move {
            let result = service.fetch_flashcards(&category).await.map_err(|e| {
                log::error!("Error loading cards for {category}: {e}");
                e.to_string()
            });
            TaskResult::FlashcardsLoaded { category, result }
        });
    }

    pub fn find_duplicates(&self) {
        let (service, _) = self.task_context();

        self.spawn(async move {
            let result = service
                .fetch_all_flashcards()
                .await
                .map(|cards| find_duplicates(&cards))
                .map_err(|e| e.to_string());
            TaskResult::DuplicatesFound(result)
        });
    }

    fn mutate<F>(&self, task: F)
    where
        F: Future<Output = Result<MutationOutcome, TarjetasError>> + Send + 'static,
    {
        self.spawn(async move {
            let result = task.await.map_err(|e| {
                log::error!("Admin change failed: {e}");
                e.to_string()
            });
            TaskResult::Mutation(result)
        });
    }

    pub fn save_category(&self, id: Option<i64>, draft: CategoryDraft) {
        let (service, _) = self.task_context();

        self.mutate(async move {
            match id {
                Some(id) => {
                    Ok(MutationOutcome::CategoryUpdated(service.update_category(id, &draft).await?))
                }
                None => Ok(MutationOutcome::CategoryCreated(service.insert_category(&draft).await?)),
            }
        });
    }

    pub fn delete_category(&self, id: i64) {
        let (service, _) = self.task_context();

        self.mutate(async move {
            service.delete_category(id).await?;
            Ok(MutationOutcome::CategoryDeleted(id))
        });
    }

    pub fn save_flashcard(&self, id: Option<i64>, draft: FlashcardDraft) {
        let (service, _) = self.task_context();

        self.mutate(async move {
            match id {
                Some(id) => Ok(MutationOutcome::CardUpdated(service.update_flashcard(id, &draft).await?)),
                None => Ok(MutationOutcome::CardCreated(service.insert_flashcard(&draft).await?)),
            }
        });
    }

    pub fn delete_flashcard(&self, id: i64) {
        let (service, _) = self.task_context();

        self.mutate(async move {
            service.delete_flashcard(id).await?;
            Ok(MutationOutcome::CardDeleted(id))
        });
    }

    /// Strips stray tanwin from every card, writing back only the rows that changed.
    pub fn clean_nunation(&self) {
        let (service, _) = self.task_context();

        self.mutate(async move {
            let cleaner = NunationCleaner::new()?;
            let cards = service.fetch_all_flashcards().await?;

            let changed: Vec<(i64, FlashcardDraft)> = cards
                .iter()
                .filter_map(|card| {
                    let cleaned = cleaner.clean(&card.arabic);
                    (cleaned != card.arabic).then(|| {
                        let mut draft = FlashcardDraft::from(card);
                        draft.arabic = cleaned;
                        (card.id, draft)
                    })
                })
                .collect();

            log::info!("Nunation cleanup: {} of {} cards need changes", changed.len(), cards.len());

            let writes: Vec<_> = changed.iter().map(|(id, draft)| service.update_flashcard(*id, draft)).collect();
            stream::iter(writes)
                .buffer_unordered(WRITE_CONCURRENCY)
                .try_collect::<Vec<_>>()
                .await?;

            Ok(MutationOutcome::NunationCleaned { updated: changed.len() })
        });
    }

    pub fn resolve_duplicates(&self, keep: i64, remove: Vec<i64>) {
        let (service, _) = self.task_context();

        self.mutate(async move {
            let deletes: Vec<_> = remove.iter().map(|id| service.delete_flashcard(*id)).collect();
            stream::iter(deletes)
                .buffer_unordered(WRITE_CONCURRENCY)
                .try_collect::<Vec<_>>()
                .await?;
            Ok(MutationOutcome::DuplicatesResolved { kept: keep, removed: remove.len() })
        });
    }

    /// Blocks until `count` results arrived or a few seconds passed.
    #[cfg(test)]
    pub fn wait_for(&mut self, count: usize) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while results.len() < count {
            match self.receiver.recv_timeout(std::time::Duration::from_secs(5)) {
                Ok(result) => results.push(result),
                Err(_) => break,
            }
        }
        results
    }
}
