//! Ranked predictor service: the HTTP side of the predictor wire contract,
//! plus local diagnosis and health routes over the same engine.

pub mod error;
pub mod guide;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use guide::{GuideRow, SymptomGuide};
pub use router::{predictor_router, ServiceContext};
pub use server::{start_predictor_server, PredictorServer, ServerError, ServerSession};
