use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

pub mod css;
pub mod diff;
pub mod mode;
pub mod text;
pub mod tokens;

// varkit commands
//
// every feature of the toolkit is expressed as a request/response pair, which replaces
// the old button-press callbacks.  the presentation layer (currently just the cli) builds
// a request, hands it to the workbench in common, and renders whatever comes back.
//
// responses are plain data so that they can be printed as json as easily as text
pub trait Command: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Resp: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    const NAME: &'static str;
}

// ties FooReq to FooResp and names the command "foo" for logging
#[macro_export]
macro_rules! command {
    ($name:ident) => {
        paste::paste! {
            impl $crate::Command for [<$name:camel Req>] {
                type Resp = [<$name:camel Resp>];

                const NAME: &'static str = stringify!([<$name:snake>]);
            }
        }
    };
}
