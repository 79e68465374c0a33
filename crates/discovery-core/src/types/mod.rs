mod endpoints;
mod param_pack;
mod result;
mod token;

pub use endpoints::*;
pub use param_pack::*;
pub use result::*;
pub use token::*;
