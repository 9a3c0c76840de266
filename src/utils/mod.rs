pub mod cookie;
pub mod flash;
pub mod hash;
pub mod html;
pub mod session;
