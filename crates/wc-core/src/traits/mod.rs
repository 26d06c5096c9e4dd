//! Core trait definitions

mod transport;

pub use transport::{
    Connector, NoticeReceiver, NoticeSender, SocketCommand, SocketEvent, SocketHandle,
    SocketNotice,
};
