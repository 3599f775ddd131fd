//! In-process host for tests.
//!
//! - `add_kv_store`, `add_kv_entry` and `add_config_store` seed the stores.
//! - `get_kv_entry` reads back what the guest inserted.
//! - `fail_next` makes the next host call fail with the given error,
//!   `fail_after` lets some calls succeed first.
//! - `WANT_ERROR` is a byte that makes a body read or write fail.
//! - `IO_INTERRUPT` is a byte that ends a body read or write early.
//!
//! The host rules the guest cannot see are applied here:
//! - KV store open: unknown or empty name is `INVAL`.
//! - KV key: empty, longer than `MAX_KEY_LEN`, containing CR or LF, `.`, `..`
//!   or under `.well-known/acme-challenge/` is `INVAL`; a missing key is `NONE`.
//! - Config store open: empty name is `NONE`, longer than
//!   `MAX_STORE_NAME_LEN` is `UNSUPPORTED`, characters outside
//!   `[A-Za-z0-9_.-]` are `INVAL`, an unknown name is `BADF`.
//! - Config store get: removed store is `BADF`, missing key is `NONE`, a short
//!   buffer is `BUFLEN` with the needed length in `nwritten`.
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use compute_abi::{
    BodyHandle, ConfigStoreHandle, HostError, HostRuntime, HostStatus, KvStoreHandle,
};

pub const WANT_ERROR: char = '\u{0001}';
pub const IO_INTERRUPT: char = '\n';

pub const MAX_STORE_NAME_LEN: usize = 255;
pub const MAX_KEY_LEN: usize = 1024;

const ACME_CHALLENGE_PREFIX: &str = ".well-known/acme-challenge/";

struct MockBody {
    buffer: Vec<u8>,
    pos: usize,
}

#[derive(Default)]
struct HostState {
    kv_stores: HashMap<String, HashMap<String, Vec<u8>>>,
    kv_handles: Vec<String>,
    config_stores: HashMap<String, HashMap<String, String>>,
    config_handles: Vec<String>,
    bodies: Vec<Option<MockBody>>,
    fail: Option<(usize, HostError)>,
    calls: usize,
}

impl HostState {
    fn kv_store_mut(
        &mut self,
        store: KvStoreHandle,
    ) -> Result<&mut HashMap<String, Vec<u8>>, HostError> {
        let name = slot(&self.kv_handles, store.0).ok_or(HostStatus::Badf)?;
        Ok(self.kv_stores.get_mut(name).ok_or(HostStatus::Badf)?)
    }

    fn body_mut(&mut self, body: BodyHandle) -> Result<&mut MockBody, HostError> {
        let index = usize::try_from(body.0).map_err(|_| HostStatus::Badf)?;
        match self.bodies.get_mut(index) {
            Some(Some(body)) => Ok(body),
            _ => Err(HostStatus::Badf.into()),
        }
    }

    fn take_body(&mut self, body: BodyHandle) -> Result<MockBody, HostError> {
        let index = usize::try_from(body.0).map_err(|_| HostStatus::Badf)?;
        self.bodies
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| HostStatus::Badf.into())
    }

    fn push_body(&mut self, buffer: Vec<u8>) -> Result<BodyHandle, HostError> {
        self.bodies.push(Some(MockBody { buffer, pos: 0 }));
        next_handle(self.bodies.len()).map(BodyHandle)
    }
}

/// Shared, clonable mocked host. Clones see the same stores.
#[derive(Clone, Default)]
pub struct MockHost {
    inner: Rc<RefCell<HostState>>,
}

impl MockHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_kv_store(&self, name: &str) {
        self.inner
            .borrow_mut()
            .kv_stores
            .entry(name.to_string())
            .or_default();
    }

    /// Seed a KV entry, creating the store if needed.
    pub fn add_kv_entry(&self, store: &str, key: &str, value: impl Into<Vec<u8>>) {
        self.inner
            .borrow_mut()
            .kv_stores
            .entry(store.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn get_kv_entry(&self, store: &str, key: &str) -> Option<Vec<u8>> {
        self.inner
            .borrow()
            .kv_stores
            .get(store)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    pub fn add_config_store<K, V>(&self, name: &str, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.inner
            .borrow_mut()
            .config_stores
            .insert(name.to_string(), entries);
    }

    /// Drop a KV store while handles to it stay open.
    pub fn remove_kv_store(&self, name: &str) {
        self.inner.borrow_mut().kv_stores.remove(name);
    }

    /// Drop a config store while handles to it stay open.
    pub fn remove_config_store(&self, name: &str) {
        self.inner.borrow_mut().config_stores.remove(name);
    }

    /// Fail the next host call with `err`.
    pub fn fail_next(&self, err: impl Into<HostError>) {
        self.fail_after(0, err);
    }

    /// Let `calls` host calls succeed, then fail the one after with `err`.
    pub fn fail_after(&self, calls: usize, err: impl Into<HostError>) {
        self.inner.borrow_mut().fail = Some((calls, err.into()));
    }

    /// Bodies created and not yet closed or handed over by an insert.
    #[must_use]
    pub fn open_bodies(&self) -> usize {
        self.inner.borrow().bodies.iter().flatten().count()
    }

    /// Number of host calls made so far.
    #[must_use]
    pub fn host_calls(&self) -> usize {
        self.inner.borrow().calls
    }

    fn enter(&self) -> Result<RefMut<'_, HostState>, HostError> {
        let mut state = self.inner.borrow_mut();
        state.calls += 1;
        match state.fail.take() {
            Some((0, err)) => return Err(err),
            Some((calls, err)) => state.fail = Some((calls - 1, err)),
            None => {}
        }
        Ok(state)
    }
}

impl HostRuntime for MockHost {
    fn kv_open(&self, name: &str) -> Result<KvStoreHandle, HostError> {
        let mut state = self.enter()?;
        if name.is_empty() || !state.kv_stores.contains_key(name) {
            return Err(HostStatus::Inval.into());
        }
        state.kv_handles.push(name.to_string());
        next_handle(state.kv_handles.len()).map(KvStoreHandle)
    }

    fn kv_lookup(&self, store: KvStoreHandle, key: &str) -> Result<BodyHandle, HostError> {
        let mut state = self.enter()?;
        let entries = state.kv_store_mut(store)?;
        check_kv_key(key)?;
        let value = entries.get(key).cloned().ok_or(HostStatus::None)?;
        state.push_body(value)
    }

    fn kv_insert(
        &self,
        store: KvStoreHandle,
        key: &str,
        body: BodyHandle,
    ) -> Result<(), HostError> {
        let mut state = self.enter()?;
        state.kv_store_mut(store)?;
        check_kv_key(key)?;
        let body = state.take_body(body)?;
        state
            .kv_store_mut(store)?
            .insert(key.to_string(), body.buffer);
        Ok(())
    }

    fn kv_delete(&self, store: KvStoreHandle, key: &str) -> Result<(), HostError> {
        let mut state = self.enter()?;
        let entries = state.kv_store_mut(store)?;
        check_kv_key(key)?;
        entries.remove(key).ok_or(HostStatus::None)?;
        Ok(())
    }

    fn config_store_open(&self, name: &str) -> Result<ConfigStoreHandle, HostError> {
        let mut state = self.enter()?;
        if name.is_empty() {
            return Err(HostStatus::None.into());
        }
        if name.len() > MAX_STORE_NAME_LEN {
            return Err(HostStatus::Unsupported.into());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(HostStatus::Inval.into());
        }
        if !state.config_stores.contains_key(name) {
            return Err(HostStatus::Badf.into());
        }
        state.config_handles.push(name.to_string());
        next_handle(state.config_handles.len()).map(ConfigStoreHandle)
    }

    fn config_store_get(
        &self,
        store: ConfigStoreHandle,
        key: &str,
        value: &mut [u8],
        nwritten: &mut usize,
    ) -> Result<(), HostError> {
        let state = self.enter()?;
        let name = slot(&state.config_handles, store.0).ok_or(HostStatus::Badf)?;
        let entries = state.config_stores.get(name).ok_or(HostStatus::Badf)?;
        let found = entries.get(key).ok_or(HostStatus::None)?.as_bytes();

        *nwritten = found.len();
        let Some(dest) = value.get_mut(..found.len()) else {
            return Err(HostStatus::Buflen.into());
        };
        dest.copy_from_slice(found);
        Ok(())
    }

    fn body_new(&self) -> Result<BodyHandle, HostError> {
        let mut state = self.enter()?;
        state.push_body(Vec::new())
    }

    fn body_read(&self, body: BodyHandle, buffer: &mut [u8]) -> Result<usize, HostError> {
        let mut state = self.enter()?;
        let body = state.body_mut(body)?;

        let mut copied = 0;
        for b in buffer.iter_mut() {
            let Some(&ch) = body.buffer.get(body.pos) else {
                break;
            };
            if ch == WANT_ERROR as u8 {
                if copied == 0 {
                    return Err(HostStatus::Error.into());
                }
                break;
            }
            *b = ch;
            body.pos += 1;
            copied += 1;
            if ch == IO_INTERRUPT as u8 {
                break;
            }
        }
        Ok(copied)
    }

    fn body_write(&self, body: BodyHandle, buffer: &[u8]) -> Result<usize, HostError> {
        let mut state = self.enter()?;
        let body = state.body_mut(body)?;

        let len_before = body.buffer.len();
        for &ch in buffer {
            if ch == WANT_ERROR as u8 {
                return Err(HostStatus::Error.into());
            }
            body.buffer.push(ch);
            if ch == IO_INTERRUPT as u8 {
                break;
            }
        }
        Ok(body.buffer.len() - len_before)
    }

    fn body_close(&self, body: BodyHandle) -> Result<(), HostError> {
        let mut state = self.enter()?;
        state.take_body(body).map(drop)
    }
}

fn check_kv_key(key: &str) -> Result<(), HostError> {
    let invalid = key.is_empty()
        || key.len() > MAX_KEY_LEN
        || key.contains(['\r', '\n'])
        || key == "."
        || key == ".."
        || key.starts_with(ACME_CHALLENGE_PREFIX);
    if invalid {
        Err(HostStatus::Inval.into())
    } else {
        Ok(())
    }
}

fn slot(names: &[String], handle: u32) -> Option<&String> {
    names.get(usize::try_from(handle).ok()?)
}

fn next_handle(len: usize) -> Result<u32, HostError> {
    u32::try_from(len - 1).map_err(|_| HostStatus::LimitExceeded.into())
}
