pub mod canonical;
pub mod dedupe;
pub mod filter;
pub mod normalize;
pub mod platform;
pub mod redirect;

pub use canonical::canonicalize;
pub use dedupe::dedupe_by_key;
pub use filter::FilterConfig;
pub use normalize::{clean_source, normalize_url};
pub use platform::Platform;
pub use redirect::resolve_l_facebook;
