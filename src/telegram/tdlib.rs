use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
};

use tdlib_rs::{enums, functions, types};
use tokio::runtime::Handle;

use crate::{
    domain::{
        chat::{Chat, ChatKind},
        folder::{ChatFolder, FolderTab},
    },
    usecases::list_chats::ChatSourceError,
};

use super::chat_cache::{ChatCache, ChatCacheUpdate};

const RECEIVE_LOOP_STARTED: &str = "TDLIB_RECEIVE_LOOP_STARTED";
const RECEIVE_LOOP_STOPPED: &str = "TDLIB_RECEIVE_LOOP_STOPPED";
const RECEIVE_LOOP_SHUTDOWN_FAILED: &str = "TDLIB_RECEIVE_LOOP_SHUTDOWN_FAILED";
const UPDATE_SIGNAL_SEND_FAILED: &str = "TDLIB_UPDATE_SIGNAL_SEND_FAILED";
const PARAMETERS_REJECTED: &str = "TDLIB_PARAMETERS_REJECTED";
const CACHE_LOCK_POISONED: &str = "TDLIB_CACHE_LOCK_POISONED";

const FALLBACK_PREVIEW: &str = "[Message]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Pending,
    LoginRequired,
    Ready,
    Closed,
}

/// Values handed to TDLib when it asks for its parameters.
#[derive(Debug, Clone)]
pub struct TdlibParameters {
    pub use_test_dc: bool,
    pub database_dir: PathBuf,
    pub files_dir: PathBuf,
    pub api_id: i32,
    pub api_hash: String,
}

/// State the receive thread shares with the adapter.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub cache: Arc<Mutex<ChatCache>>,
    pub authorization: Arc<Mutex<AuthorizationStatus>>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            cache: Arc::new(Mutex::new(ChatCache::default())),
            authorization: Arc::new(Mutex::new(AuthorizationStatus::Pending)),
        }
    }
}

struct ReceiveContext {
    client_id: i32,
    runtime: Handle,
    parameters: TdlibParameters,
    shared: SharedState,
    update_tx: Sender<()>,
    auth_tx: Sender<AuthorizationStatus>,
}

/// Thread draining `tdlib_rs::receive`. Function responses are routed by that
/// call too, so the thread must be running before any request is awaited.
#[derive(Debug)]
pub struct ReceiveLoop {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ReceiveLoop {
    pub fn start(
        client_id: i32,
        runtime: Handle,
        parameters: TdlibParameters,
        shared: SharedState,
        update_tx: Sender<()>,
        auth_tx: Sender<AuthorizationStatus>,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let context = ReceiveContext {
            client_id,
            runtime,
            parameters,
            shared,
            update_tx,
            auth_tx,
        };

        let worker_stop = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("telewatch-tdlib-receive".to_owned())
            .spawn(move || run_receive_loop(context, worker_stop))?;

        tracing::info!(code = RECEIVE_LOOP_STARTED, client_id, "tdlib receive loop started");

        Ok(Self {
            stop,
            worker: Some(worker),
        })
    }
}

impl Drop for ReceiveLoop {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);

        if let Some(worker) = self.worker.take() {
            if let Err(error) = worker.join() {
                tracing::warn!(
                    code = RECEIVE_LOOP_SHUTDOWN_FAILED,
                    error = ?error,
                    "tdlib receive loop panicked on shutdown"
                );
            }
        }
    }
}

fn run_receive_loop(context: ReceiveContext, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        let Some((update, client_id)) = tdlib_rs::receive() else {
            continue;
        };
        if client_id != context.client_id {
            continue;
        }

        if let enums::Update::AuthorizationState(state) = update {
            let status = handle_authorization(&context, state.authorization_state);
            if status == Some(AuthorizationStatus::Closed) {
                break;
            }
            continue;
        }

        if let enums::Update::NewChat(ref new_chat) = update {
            if let enums::ChatType::Private(ref private) = new_chat.chat.r#type {
                resolve_bot(&context, private.user_id);
            }
        }

        if let Some(cache_update) = map_update(update) {
            apply(&context.shared, &context.update_tx, cache_update);
        }
    }

    tracing::info!(code = RECEIVE_LOOP_STOPPED, "tdlib receive loop stopped");
}

fn apply(shared: &SharedState, update_tx: &Sender<()>, update: ChatCacheUpdate) {
    let changed = match shared.cache.lock() {
        Ok(mut cache) => cache.apply(update),
        Err(_) => {
            tracing::error!(code = CACHE_LOCK_POISONED, "chat cache lock poisoned");
            return;
        }
    };

    if changed {
        signal(update_tx);
    }
}

fn signal(update_tx: &Sender<()>) {
    if let Err(error) = update_tx.send(()) {
        tracing::debug!(
            code = UPDATE_SIGNAL_SEND_FAILED,
            error = %error,
            "chat update signal dropped"
        );
    }
}

fn handle_authorization(
    context: &ReceiveContext,
    state: enums::AuthorizationState,
) -> Option<AuthorizationStatus> {
    let status = match state {
        enums::AuthorizationState::WaitTdlibParameters => {
            send_parameters(context);
            return None;
        }
        enums::AuthorizationState::Ready => AuthorizationStatus::Ready,
        enums::AuthorizationState::Closed => AuthorizationStatus::Closed,
        enums::AuthorizationState::LoggingOut | enums::AuthorizationState::Closing => return None,
        _ => AuthorizationStatus::LoginRequired,
    };

    tracing::info!(status = ?status, "tdlib authorization state changed");
    if let Ok(mut authorization) = context.shared.authorization.lock() {
        *authorization = status;
    }
    let _ = context.auth_tx.send(status);
    signal(&context.update_tx);

    Some(status)
}

fn send_parameters(context: &ReceiveContext) {
    let client_id = context.client_id;
    let parameters = context.parameters.clone();

    context.runtime.spawn(async move {
        let result = functions::set_tdlib_parameters(
            parameters.use_test_dc,
            parameters.database_dir.to_string_lossy().into_owned(),
            parameters.files_dir.to_string_lossy().into_owned(),
            String::new(),
            true,
            true,
            true,
            false,
            parameters.api_id,
            parameters.api_hash,
            "en".to_owned(),
            "Terminal".to_owned(),
            std::env::consts::OS.to_owned(),
            env!("CARGO_PKG_VERSION").to_owned(),
            client_id,
        )
        .await;

        if let Err(error) = result {
            tracing::error!(
                code = PARAMETERS_REJECTED,
                error_code = error.code,
                message = %error.message,
                "tdlib rejected parameters"
            );
        }
    });
}

fn resolve_bot(context: &ReceiveContext, user_id: i64) {
    let client_id = context.client_id;
    let shared = context.shared.clone();
    let update_tx = context.update_tx.clone();

    context.runtime.spawn(async move {
        match functions::get_user(user_id, client_id).await {
            Ok(enums::User::User(user)) => {
                if matches!(user.r#type, enums::UserType::Bot(_)) {
                    apply(&shared, &update_tx, ChatCacheUpdate::BotResolved { user_id });
                }
            }
            Err(error) => {
                tracing::debug!(user_id, error_code = error.code, "user lookup failed");
            }
        }
    });
}

fn map_update(update: enums::Update) -> Option<ChatCacheUpdate> {
    match update {
        enums::Update::NewChat(types::UpdateNewChat { chat, .. }) => Some(map_new_chat(chat)),
        enums::Update::ChatPosition(types::UpdateChatPosition {
            chat_id, position, ..
        }) => {
            matches!(position.list, enums::ChatList::Main).then_some(ChatCacheUpdate::Position {
                chat_id,
                order: position.order,
                is_pinned: position.is_pinned,
            })
        }
        enums::Update::ChatLastMessage(update) => {
            let (preview, unix_ms) = update
                .last_message
                .as_ref()
                .map(message_summary)
                .unwrap_or_default();
            Some(ChatCacheUpdate::LastMessage {
                chat_id: update.chat_id,
                preview,
                unix_ms,
            })
        }
        enums::Update::ChatTitle(types::UpdateChatTitle {
            chat_id, title, ..
        }) => {
            Some(ChatCacheUpdate::Title { chat_id, title })
        }
        enums::Update::ChatReadInbox(update) => Some(ChatCacheUpdate::ReadInbox {
            chat_id: update.chat_id,
            unread_count: u32::try_from(update.unread_count).unwrap_or(0),
        }),
        enums::Update::ChatFolders(update) => Some(ChatCacheUpdate::Folders(
            update
                .chat_folders
                .iter()
                .map(|info| FolderTab {
                    id: info.id,
                    label: folder_label(&info.icon.name, info.id),
                })
                .collect(),
        )),
        _ => None,
    }
}

fn map_new_chat(chat: types::Chat) -> ChatCacheUpdate {
    let (kind, user_id) = match &chat.r#type {
        enums::ChatType::Private(private) => (ChatKind::Private, Some(private.user_id)),
        enums::ChatType::BasicGroup(_) => (ChatKind::Group, None),
        enums::ChatType::Supergroup(supergroup) if supergroup.is_channel => {
            (ChatKind::Channel, None)
        }
        enums::ChatType::Supergroup(_) => (ChatKind::Group, None),
        enums::ChatType::Secret(_) => (ChatKind::Secret, None),
    };
    let main_position = chat
        .positions
        .iter()
        .find(|position| matches!(position.list, enums::ChatList::Main));
    let (last_message_preview, last_message_unix_ms) = chat
        .last_message
        .as_ref()
        .map(message_summary)
        .unwrap_or_default();

    ChatCacheUpdate::NewChat {
        chat: Chat {
            id: chat.id,
            title: chat.title,
            last_message_preview,
            last_message_unix_ms,
            unread_count: u32::try_from(chat.unread_count).unwrap_or(0),
            is_pinned: main_position.is_some_and(|position| position.is_pinned),
            is_read: chat.unread_count == 0,
            is_bot: false,
            kind,
        },
        main_order: main_position.map_or(0, |position| position.order),
        user_id,
    }
}

fn message_summary(message: &types::Message) -> (String, Option<i64>) {
    let preview = match &message.content {
        enums::MessageContent::MessageText(text) => text.text.text.clone(),
        enums::MessageContent::MessagePhoto(photo) => media_preview("[Photo]", &photo.caption.text),
        enums::MessageContent::MessageVideo(video) => media_preview("[Video]", &video.caption.text),
        enums::MessageContent::MessageSticker(sticker) => {
            media_preview("[Sticker]", &sticker.sticker.emoji)
        }
        _ => FALLBACK_PREVIEW.to_owned(),
    };

    (preview, Some(i64::from(message.date) * 1_000))
}

fn media_preview(marker: &str, caption: &str) -> String {
    if caption.is_empty() {
        marker.to_owned()
    } else {
        format!("{marker} {caption}")
    }
}

/// Private chat standing in for a contact the chat cache has not seen.
pub fn contact_chat(user: types::User) -> Chat {
    Chat {
        id: user.id,
        title: contact_title(&user.first_name, &user.last_name),
        is_bot: matches!(user.r#type, enums::UserType::Bot(_)),
        is_read: true,
        kind: ChatKind::Private,
        ..Chat::default()
    }
}

fn contact_title(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}").trim().to_owned()
}

fn folder_label(icon_name: &str, id: i32) -> String {
    if icon_name.is_empty() {
        format!("Folder {id}")
    } else {
        format!("{icon_name} {id}")
    }
}

pub fn map_folder(folder: enums::ChatFolder) -> ChatFolder {
    let enums::ChatFolder::ChatFolder(folder) = folder;

    ChatFolder {
        pinned_chat_ids: folder.pinned_chat_ids.into_iter().collect(),
        included_chat_ids: folder.included_chat_ids.into_iter().collect(),
        excluded_chat_ids: folder.excluded_chat_ids.into_iter().collect(),
        include_contacts: folder.include_contacts,
        include_non_contacts: folder.include_non_contacts,
        include_bots: folder.include_bots,
        include_groups: folder.include_groups,
        include_channels: folder.include_channels,
    }
}

/// Maps a TDLib error code. 404 from `loadChats` means the list is fully
/// loaded and is handled by the caller before reaching this.
pub fn map_error_code(code: i32) -> ChatSourceError {
    match code {
        401 => ChatSourceError::Unauthorized,
        400 => ChatSourceError::InvalidData,
        420 | 429 | 500..=599 => ChatSourceError::Unavailable,
        _ => ChatSourceError::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_tdlib_error_codes() {
        assert_eq!(map_error_code(401), ChatSourceError::Unauthorized);
        assert_eq!(map_error_code(400), ChatSourceError::InvalidData);
        assert_eq!(map_error_code(429), ChatSourceError::Unavailable);
        assert_eq!(map_error_code(503), ChatSourceError::Unavailable);
        assert_eq!(map_error_code(-1), ChatSourceError::Unknown);
    }

    #[test]
    fn media_preview_appends_caption_when_present() {
        assert_eq!(media_preview("[Photo]", ""), "[Photo]");
        assert_eq!(media_preview("[Photo]", "sunset"), "[Photo] sunset");
    }

    #[test]
    fn contact_title_joins_non_empty_names() {
        assert_eq!(contact_title("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(contact_title("Ada", ""), "Ada");
        assert_eq!(contact_title("", "Lovelace"), "Lovelace");
    }

    #[test]
    fn folder_label_falls_back_to_id() {
        assert_eq!(folder_label("", 4), "Folder 4");
        assert_eq!(folder_label("Work", 4), "Work 4");
    }
}
