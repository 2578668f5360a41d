use crate::core::types::IdToken;

macro_rules! generate_component_token {
    ($token_type:ident for $inst_type:literal) => {
        #[doc = concat!(
            "An identifier used as a reference for a ",
            $inst_type,
            ", stored inside a scene\n\nTokens are indices into the scene's storage, and are only valid for the scene that issued them"
        )]
        #[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
        pub struct $token_type(pub IdToken);

        impl std::fmt::Display for $token_type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{:0>4X}", stringify!($token_type), self.0)
            }
        }
    };
}

generate_component_token!(ObjectToken for "geometry object");
generate_component_token!(LightToken for "light");
