//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to                  |
//! |-------------|---------------------|------------------------------|
//! | `display`   | GeometryPort        | Static screen layout         |
//! |             | RenderSink          | Log-backed overlay           |
//! | `log_sink`  | EventSink           | `log` facade                 |
//! | `sampler`   | SamplerPort         | Scripted readings            |
//! | `store`     | StoragePort         | In-memory map / directory    |
//! | `time`      | (clock source)      | `std::time::Instant`         |

pub mod display;
pub mod log_sink;
pub mod sampler;
pub mod store;
pub mod time;
