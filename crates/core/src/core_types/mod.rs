//! Core types shared by the cloud and its sub-models

pub mod flow;
pub mod injection;
pub mod liquid;
pub mod parcel;
pub mod vec3;

pub use flow::{FlowSampler, FlowState, UniformFlow};
pub use injection::InjectionEvent;
pub use liquid::LiquidProperties;
pub use parcel::{Parcel, ParcelSeed};
pub use vec3::Vec3;
