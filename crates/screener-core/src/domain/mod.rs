//! 스크리너 도메인 모델.

mod company;
mod dataset;
mod record;

pub use company::*;
pub use dataset::*;
pub use record::*;
