//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sitepack.toml`:
//!
//! | Module      | TOML Section   | Purpose                                    |
//! |-------------|----------------|--------------------------------------------|
//! | `pages`     | `[pages]`      | Page file extension                        |
//! | `bundle`    | `[bundle]`     | Output names, style keys, script policy    |
//! | `preloader` | `[preloader]`  | Spinner markup marker and depth            |

mod bundle;
mod pages;
mod preloader;

pub use bundle::{BundleConfig, ScriptPolicyConfig, StyleKey};
pub use pages::PagesConfig;
pub use preloader::PreloaderConfig;
