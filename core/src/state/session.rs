//! 会话状态管理

use super::snapshot::{decode_record, encode_record};
use super::transitions::SessionTransition;
use super::types::{SessionPhase, StateEvent};
use crate::store::{DurableStore, PersistOp, PersistQueue, AUTH_SESSION_KEY};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// 会话 ID：数字（登录时间戳）或任意字符串
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
    Numeric(i64),
    Text(String),
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// 已认证用户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub email: String,
}

impl Session {
    pub fn new(id: SessionId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// 以当前毫秒时间戳为 ID
    pub fn stamped(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(
            SessionId::Numeric(Utc::now().timestamp_millis()),
            name,
            email,
        )
    }
}

#[derive(Debug, Clone)]
enum SessionState {
    Initializing,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        match self {
            Self::Initializing => SessionPhase::Initializing,
            Self::Authenticated(_) => SessionPhase::Authenticated,
            Self::Unauthenticated => SessionPhase::Unauthenticated,
        }
    }
}

/// 会话状态的原子快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub session: Option<Session>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Initializing
    }
}

/// 会话管理器
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    state: RwLock<SessionState>,
    store: Arc<dyn DurableStore>,
    persist: PersistQueue,
    event_tx: broadcast::Sender<StateEvent>,
    /// initialize() 只执行一次
    init_started: AtomicBool,
    /// 每次 login/logout 递增，用于丢弃过期的初始化读取
    generation: AtomicU64,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn DurableStore>,
        persist: PersistQueue,
        event_tx: broadcast::Sender<StateEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionManagerInner {
                state: RwLock::new(SessionState::Initializing),
                store,
                persist,
                event_tx,
                init_started: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.read().await;
        SessionSnapshot {
            phase: state.phase(),
            session: match &*state {
                SessionState::Authenticated(s) => Some(s.clone()),
                _ => None,
            },
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.state.read().await.phase()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.phase().await == SessionPhase::Authenticated
    }

    /// 读取持久化会话。每个进程只执行一次，之后的调用直接返回当前阶段。
    ///
    /// 读取失败或记录无法解析都视为没有会话。若读取期间发生了
    /// login/logout，读取结果被丢弃。
    pub async fn initialize(&self) -> SessionPhase {
        if self.inner.init_started.swap(true, Ordering::SeqCst) {
            return self.phase().await;
        }

        let generation = self.inner.generation.load(Ordering::SeqCst);
        self.inner.persist.flush().await;
        let loaded = match self.inner.store.get(AUTH_SESSION_KEY).await {
            Ok(Some(raw)) => match decode_record::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(
                        target: "fitbuddy.session",
                        stage = "session.init.decode_failed",
                        error = %e
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    target: "fitbuddy.session",
                    stage = "session.init.read_failed",
                    error = %e
                );
                None
            }
        };

        let mut state = self.inner.state.write().await;
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                target: "fitbuddy.session",
                stage = "session.init.stale",
                phase = %state.phase()
            );
            return state.phase();
        }

        let next = match loaded {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unauthenticated,
        };
        self.apply(&mut state, next)
    }

    /// 登录：立即切换到 Authenticated，并排队写入存储
    pub async fn login(&self, session: Session) -> SessionPhase {
        let mut state = self.inner.state.write().await;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        match encode_record(&session) {
            Ok(raw) => {
                self.inner.persist.submit(PersistOp::Set {
                    key: AUTH_SESSION_KEY.to_string(),
                    value: raw,
                });
            }
            Err(e) => tracing::warn!(
                target: "fitbuddy.session",
                stage = "session.login.encode_failed",
                error = %e
            ),
        }

        tracing::info!(
            target: "fitbuddy.session",
            stage = "session.login",
            session_id = %session.id,
            email = %session.email
        );
        self.apply(&mut state, SessionState::Authenticated(session))
    }

    /// 登出：立即切换到 Unauthenticated，并排队删除存储中的会话
    pub async fn logout(&self) -> SessionPhase {
        let mut state = self.inner.state.write().await;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.persist.submit(PersistOp::Delete {
            key: AUTH_SESSION_KEY.to_string(),
        });
        tracing::info!(target: "fitbuddy.session", stage = "session.logout");
        self.apply(&mut state, SessionState::Unauthenticated)
    }

    fn apply(&self, state: &mut SessionState, next: SessionState) -> SessionPhase {
        let old_phase = state.phase();
        let new_phase = next.phase();
        if let Err(e) = SessionTransition::validate(old_phase, new_phase) {
            tracing::error!(target: "fitbuddy.session", stage = "session.transition", error = %e);
            return old_phase;
        }
        *state = next;
        let _ = self.inner.event_tx.send(StateEvent::SessionChanged {
            old_phase,
            new_phase,
            timestamp: Utc::now(),
        });
        new_phase
    }
}
