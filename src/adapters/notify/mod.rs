//! Outbound signals
//!
//! - [`success`] - Sentinel files posted to the success sink
//! - [`monitoring`] - Run-level alert on the monitoring topic
//! - [`pushgateway`] - Final metrics flush

pub mod factory;
pub mod monitoring;
pub mod pushgateway;
pub mod success;
pub mod traits;

pub use factory::{create_sinks, Sinks};
pub use monitoring::{HttpMonitoringPublisher, MonitoringMessage};
pub use pushgateway::PushGatewayClient;
pub use success::{HttpSuccessSink, Sentinel};
pub use traits::{
    Delivery, MetricsPusher, MonitoringPublisher, SignalKind, SinkResult, SuccessSink,
};
