//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `hardware`     | SensorPort         | ESP32 ADC, test button GPIO  |
//! |                | KeypadPort         | 4×4 matrix keypad            |
//! |                | IndicatorPort      | Siren, strobe, LED GPIOs     |
//! |                | DisplayPort        | 20×4 character panel mirror  |
//! | `log_sink`     | EventSink          | Serial log output            |
//! | `embedded_config` | ConfigPort      | Build-time JSON override     |

pub mod embedded_config;
pub mod hardware;
pub mod log_sink;
