//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | ActuatorPort       | ESP32 GPIO relays        |
//! |                | SensorPort (Dht11) | DHT11 data line          |
//! | `log_sink`     | AlertSink          | Serial log output        |
//! |                | CloudSink          |                          |
//! |                | DisplaySink        |                          |

pub mod hardware;
pub mod log_sink;
