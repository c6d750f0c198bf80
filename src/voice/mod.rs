//! Voice identities: the registry of built-in and trained voices, and the
//! storage that holds trained voices' reference audio.

mod identity;
mod registry;
mod store;

pub use identity::{BUILT_IN_VOICES, VoiceIdentity, VoiceKind, VoiceReference, built_in_voices};
pub use registry::{RegistryError, VoiceRegistry};
pub use store::{DEFAULT_EXTENSION, ReferenceStore, StorageError, extension_for_mime};
