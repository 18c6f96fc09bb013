pub mod create_template;
pub mod deploy_contract;
pub mod update_template;

pub use create_template::*;
pub use deploy_contract::*;
pub use update_template::*;
