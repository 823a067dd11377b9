//! ECS resources made available to systems.
//!
//! Overview
//! - `debugmode` – presence enables per-tick shadow placement logs
//! - `demorng` – seeded random source for the demo character
//! - `scene` – JSON description of floors and the demo character
//! - `shadowlog` – last state and landing counts per shadow
//! - `shadowsettings` – shadow defaults and simulation settings, loaded from INI
//! - `worldtime` – simulation time and delta
pub mod debugmode;
pub mod demorng;
pub mod scene;
pub mod shadowlog;
pub mod shadowsettings;
pub mod worldtime;
