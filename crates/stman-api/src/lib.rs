// stman-api: Async Rust client for the Syncthing REST API

pub mod client;
pub mod devices;
pub mod error;
pub mod folders;
pub mod models;
pub mod system;
pub mod transport;

pub use client::{API_KEY_HEADER, SyncthingClient};
pub use error::Error;
pub use models::{
    Compression, Connection, Connections, Device, DeviceEdit, Folder, FolderDevice, FolderEdit,
    FolderStatus, FolderType, NewDevice, NewFolder, PullOrder, Size, SystemStatus, Versioning,
    VersioningPolicy,
};
pub use transport::{TlsMode, TransportConfig};
