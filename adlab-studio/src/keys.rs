//! Credential sourcing and the key selection prompt.

use adlab_gemini::Credential;
use async_trait::async_trait;

/// Supplies the credential for the next API call.
///
/// Looked up per call, never cached, so a key picked mid-session takes
/// effect immediately.
pub trait KeySource: Send + Sync {
    fn current(&self) -> Option<Credential>;
}

/// A fixed key.
pub struct StaticKey(Credential);

impl StaticKey {
    pub fn new(credential: impl Into<Credential>) -> Self {
        Self(credential.into())
    }
}

impl KeySource for StaticKey {
    fn current(&self) -> Option<Credential> {
        Some(self.0.clone())
    }
}

/// Reads `GEMINI_API_KEY` from the environment on every call.
pub struct EnvKey;

impl KeySource for EnvKey {
    fn current(&self) -> Option<Credential> {
        Credential::from_env()
    }
}

/// The key selection surface shown to the user.
///
/// `open_select_key` resolves when the prompt is dismissed, whether or not
/// a key was actually picked; callers re-check [`Self::has_selected_key`]
/// afterwards.
#[async_trait]
pub trait KeyChooser: Send + Sync {
    async fn has_selected_key(&self) -> bool;
    async fn open_select_key(&self);
}

#[async_trait]
impl<T: KeyChooser + ?Sized> KeyChooser for std::sync::Arc<T> {
    async fn has_selected_key(&self) -> bool {
        (**self).has_selected_key().await
    }

    async fn open_select_key(&self) {
        (**self).open_select_key().await
    }
}

/// A chooser for surfaces without key selection. Reports a key as already
/// selected so nothing ever blocks on a prompt.
pub struct NoChooser;

#[async_trait]
impl KeyChooser for NoChooser {
    async fn has_selected_key(&self) -> bool {
        true
    }

    async fn open_select_key(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_key_always_yields() {
        let source = StaticKey::new("abc");
        assert_eq!(source.current().unwrap().expose(), "abc");
    }

    #[tokio::test]
    async fn shared_chooser_delegates_through_arc() {
        let chooser = std::sync::Arc::new(NoChooser);
        assert!(chooser.has_selected_key().await);
        chooser.open_select_key().await;
    }

    #[tokio::test]
    async fn no_chooser_never_prompts() {
        let chooser = NoChooser;
        assert!(chooser.has_selected_key().await);
        chooser.open_select_key().await;
        assert!(chooser.has_selected_key().await);
    }
}
