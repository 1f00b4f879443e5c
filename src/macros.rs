/// Build a [`Map`](crate::Map) from `key => value` pairs, in order.
///
/// Values can be anything that converts into a [`Value`](crate::Value),
/// including nested maps and vectors.
///
/// ```
/// use flatform::{map, Value};
///
/// let partner = map! {
///     "name" => "Acme",
///     "website" => Value::Null,
///     "seo" => map! { "title" => "Acme Corp" },
///     "tagIds" => vec![1, 2, 3],
/// };
///
/// assert_eq!(partner.len(), 4);
/// ```
#[macro_export]
macro_rules! map {
    () => {
        $crate::Map::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}
