pub mod directives;
#[cfg(feature = "siteconfig")]
pub mod loader;
pub mod parser;
pub mod registry;

pub use directives::{ContentType, Directive, SiteConfig};
#[cfg(feature = "siteconfig")]
pub use loader::{ConfigLoader, ConfigLoaderBuilder};
pub use parser::ConfigParser;
pub use registry::{DEFAULT_MAIN_SELECTORS, SiteConfigRegistry, normalize_hostname};
