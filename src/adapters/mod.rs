//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter      | Implements         | Connects to               |
//! |--------------|--------------------|---------------------------|
//! | `log_sink`   | ReportSink         | Console log output        |
//! | `json_sink`  | ReportSink         | JSON-lines telemetry      |
//! | `sim_sensor` | TemperatureSensor  | Injectable host sensor    |

pub mod json_sink;
pub mod log_sink;
pub mod sim_sensor;
