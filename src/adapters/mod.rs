//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                 |
//! |------------|----------------|-----------------------------|
//! | `hardware` | AdcPort        | ESP32 ADC1 (oneshot)        |
//! |            | SwitchPort     | Shutdown / brake GPIO lines |
//! |            | IndicatorPort  | Fault LEDs                  |
//! |            | TransportPort  | TWAI (CAN) controller       |
//! | `log_sink` | EventSink      | Serial log output           |

pub mod hardware;
pub mod log_sink;
