//! Declarative helpers for typed method wrappers

/// Declare a typed wrapper around [`Client::call`](crate::Client::call).
///
/// # Example
///
/// ```rust
/// use rpclane_client::{rpc_method, Client};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// pub struct GetObjectParams {
///     pub uid: String,
/// }
///
/// #[derive(Deserialize)]
/// pub struct UserDetails {
///     pub uid: String,
///     pub name: String,
/// }
///
/// rpc_method!(
///     /// Fetch one user.
///     pub fn call_get_user(GetObjectParams) -> UserDetails = "GetUser"
/// );
///
/// # fn demo(client: &Client) {
/// let call = call_get_user(client, &GetObjectParams { uid: "u1".to_string() });
/// call.cancel();
/// # }
/// ```
#[macro_export]
macro_rules! rpc_method {
    ($(#[$meta:meta])* $vis:vis fn $name:ident($params:ty) -> $result:ty = $method:literal) => {
        $(#[$meta])*
        $vis fn $name(
            client: &$crate::Client,
            params: &$params,
        ) -> $crate::AbortableCall<$result> {
            client.call::<$params, $result>($method, params)
        }
    };
}
