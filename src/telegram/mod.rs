//! Telegram integration layer: TDLib client, update mapping and chat cache.

pub mod chat_cache;
pub mod tdlib;

use std::{
    collections::HashSet,
    sync::mpsc::{self, Receiver, Sender},
    time::{Duration, Instant},
};

use tdlib_rs::{enums, functions};
use tokio::runtime::{Builder, Runtime};

use crate::{
    domain::{
        chat::Chat,
        folder::{ChatFolder, FolderTab},
    },
    infra::{config::TelegramConfig, storage_layout::StorageLayout},
    usecases::list_chats::{ChatSource, ChatSourceError},
};

use self::tdlib::{AuthorizationStatus, ReceiveLoop, SharedState, TdlibParameters};

/// Returns the telegram module name for smoke checks.
pub fn module_name() -> &'static str {
    "telegram"
}

const CLOSE_WAIT:Duration = Duration::from_secs(2);
const CHATS_ALL_LOADED: i32 = 404;
const TDLIB_CLOSE_FAILED: &str = "TDLIB_CLOSE_FAILED";
const CONTACT_LOOKUP_FAILED: &str = "CONTACT_LOOKUP_FAILED";

#[derive(Debug, thiserror::Error)]
pub enum TelegramStartError {
    #[error("telegram api_id/api_hash are not configured")]
    MissingCredentials,
    #[error("failed to build tdlib runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn tdlib receive thread: {0}")]
    ReceiveThread(#[source] std::io::Error),
}

/// Chat source backed by TDLib, or an offline stub with no chats.
#[derive(Debug)]
pub struct TelegramAdapter {
    backend: Option<TdlibBackend>,
}

#[derive(Debug)]
struct TdlibBackend {
    client_id: i32,
    shared: SharedState,
    auth_rx: Receiver<AuthorizationStatus>,
    receive_loop: Option<ReceiveLoop>,
    runtime: Runtime,
}

impl TelegramAdapter {
    pub fn start(
        config: &TelegramConfig,
        layout: &StorageLayout,
        update_tx: Sender<()>,
    ) -> Result<Self, TelegramStartError> {
        if config.api_id == 0 || config.api_hash.is_empty() {
            return Err(TelegramStartError::MissingCredentials);
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("telewatch-tdlib")
            .build()
            .map_err(TelegramStartError::Runtime)?;

        let client_id = tdlib_rs::create_client();
        let shared = SharedState::default();
        let (auth_tx, auth_rx) = mpsc::channel();
        let parameters = TdlibParameters {
            use_test_dc: config.use_test_dc,
            database_dir: layout.tdlib_database_dir(),
            files_dir: layout.tdlib_files_dir(),
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
        };

        let receive_loop = ReceiveLoop::start(
            client_id,
            runtime.handle().clone(),
            parameters,
            shared.clone(),
            update_tx,
            auth_tx,
        )
        .map_err(TelegramStartError::ReceiveThread)?;

        // Any first request wakes the client and starts the authorization flow.
        runtime.spawn(async move {
            let _ = functions::set_log_verbosity_level(1, client_id).await;
        });

        Ok(Self {
            backend: Some(TdlibBackend {
                client_id,
                shared,
                auth_rx,
                receive_loop: Some(receive_loop),
                runtime,
            }),
        })
    }

    pub fn stub() -> Self {
        Self { backend: None }
    }

    pub fn is_stub(&self) -> bool {
        self.backend.is_none()
    }

    /// Waits until authorization settles or `timeout` elapses.
    pub fn wait_for_authorization(&self, timeout: Duration) -> AuthorizationStatus {
        let Some(backend) = &self.backend else {
            return AuthorizationStatus::Pending;
        };

        let deadline = Instant::now() + timeout;
        let mut status = backend.authorization();
        while status == AuthorizationStatus::Pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match backend.auth_rx.recv_timeout(remaining) {
                Ok(next) => status = next,
                Err(_) => break,
            }
        }

        status
    }
}

impl TdlibBackend {
    fn authorization(&self) -> AuthorizationStatus {
        self.shared
            .authorization
            .lock()
            .map(|status| *status)
            .unwrap_or(AuthorizationStatus::Closed)
    }
}

impl Drop for TdlibBackend {
    fn drop(&mut self) {
        let client_id = self.client_id;
        self.runtime.spawn(async move {
            if let Err(error) = functions::close(client_id).await {
                tracing::warn!(
                    code = TDLIB_CLOSE_FAILED,
                    error_code = error.code,
                    "tdlib close request failed"
                );
            }
        });

        let deadline = Instant::now() + CLOSE_WAIT;
        while self.authorization() != AuthorizationStatus::Closed {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.auth_rx.recv_timeout(remaining).is_err() {
                break;
            }
        }

        drop(self.receive_loop.take());
    }
}

impl ChatSource for TelegramAdapter {
    fn chats(&self) -> Result<Vec<Chat>, ChatSourceError> {
        let Some(backend) = &self.backend else {
            return Ok(Vec::new());
        };

        match backend.authorization() {
            AuthorizationStatus::LoginRequired => return Err(ChatSourceError::Unauthorized),
            AuthorizationStatus::Closed => return Err(ChatSourceError::Unavailable),
            AuthorizationStatus::Pending | AuthorizationStatus::Ready => {}
        }

        backend
            .shared
            .cache
            .lock()
            .map(|cache| cache.chats())
            .map_err(|_| ChatSourceError::Unknown)
    }

    fn load_chats(&self, limit: usize) -> Result<(), ChatSourceError> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };
        if backend.authorization() == AuthorizationStatus::LoginRequired {
            return Err(ChatSourceError::Unauthorized);
        }

        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let result = backend.runtime.block_on(functions::load_chats(
            Some(enums::ChatList::Main),
            limit,
            backend.client_id,
        ));

        match result {
            Ok(()) => Ok(()),
            Err(error) if error.code == CHATS_ALL_LOADED => Ok(()),
            Err(error) => Err(tdlib::map_error_code(error.code)),
        }
    }

    fn folder_tabs(&self) -> Vec<FolderTab> {
        self.backend
            .as_ref()
            .and_then(|backend| backend.shared.cache.lock().ok())
            .map(|cache| cache.folder_tabs())
            .unwrap_or_default()
    }

    fn folder(&self, id: i32) -> Result<ChatFolder, ChatSourceError> {
        let backend = self.backend.as_ref().ok_or(ChatSourceError::Unavailable)?;

        backend
            .runtime
            .block_on(functions::get_chat_folder(id, backend.client_id))
            .map(tdlib::map_folder)
            .map_err(|error| tdlib::map_error_code(error.code))
    }

    fn contact_ids(&self) -> Result<HashSet<i64>, ChatSourceError> {
        let backend = self.backend.as_ref().ok_or(ChatSourceError::Unavailable)?;

        let enums::Users::Users(users) = backend
            .runtime
            .block_on(functions::get_contacts(backend.client_id))
            .map_err(|error| tdlib::map_error_code(error.code))?;

        // Private chat ids equal the peer's user id.
        Ok(users.user_ids.into_iter().collect())
    }

    fn contacts(&self) -> Result<Vec<Chat>, ChatSourceError> {
        let backend = self.backend.as_ref().ok_or(ChatSourceError::Unavailable)?;

        let enums::Users::Users(users) = backend
            .runtime
            .block_on(functions::get_contacts(backend.client_id))
            .map_err(|error| tdlib::map_error_code(error.code))?;

        let mut contacts = Vec::with_capacity(users.user_ids.len());
        for user_id in users.user_ids {
            let cached = backend
                .shared
                .cache
                .lock()
                .ok()
                .and_then(|cache| cache.chat(user_id));
            if let Some(chat) = cached {
                contacts.push(chat);
                continue;
            }

            match backend
                .runtime
                .block_on(functions::get_user(user_id, backend.client_id))
            {
                Ok(enums::User::User(user)) => contacts.push(tdlib::contact_chat(user)),
                Err(error) => tracing::debug!(
                    code = CONTACT_LOOKUP_FAILED,
                    user_id,
                    error_code = error.code,
                    "contact skipped"
                ),
            }
        }

        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_is_an_offline_source_with_no_chats() {
        let adapter = TelegramAdapter::stub();

        assert!(adapter.is_stub());
        assert_eq!(adapter.chats(), Ok(Vec::new()));
        assert_eq!(adapter.load_chats(20), Ok(()));
        assert!(adapter.folder_tabs().is_empty());
        assert_eq!(adapter.folder(1), Err(ChatSourceError::Unavailable));
        assert_eq!(adapter.contact_ids(), Err(ChatSourceError::Unavailable));
        assert_eq!(adapter.contacts(), Err(ChatSourceError::Unavailable));
    }

    #[test]
    fn stub_never_reports_authorization() {
        let adapter = TelegramAdapter::stub();

        assert_eq!(
            adapter.wait_for_authorization(Duration::from_millis(10)),
            AuthorizationStatus::Pending
        );
    }

    #[test]
    fn start_requires_api_credentials() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under_root(root.path());
        let (update_tx, _update_rx) = mpsc::channel();

        let result = TelegramAdapter::start(&TelegramConfig::default(), &layout, update_tx);

        assert!(matches!(result, Err(TelegramStartError::MissingCredentials)));
    }
}
