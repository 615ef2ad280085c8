/// Router Module Index
///
/// Routes are split by access level so the auth layer is applied once per
/// module instead of per handler.

/// Content routes: documents, question tables, navigation, sign-up.
pub mod public;

/// Routes behind the `AuthUser` extractor middleware.
pub mod authenticated;
