/// construct Scheme values from Rust code.
///
/// Examples:
///     `scheme!(abc)`  =>  abc
///     `scheme!(#t)`  =>  #t
///     `scheme!((a b))`  =>  (a b)
///     `scheme!(a, (b c))`  =>  (a (b c))
///     `let x = Value::int(5); scheme!(quote, @x)`  =>  (quote 5)
///
// much inspired by serde_json's json! macro
macro_rules! scheme {
    () => { $crate::value::Value::Nil };
    (()) => { $crate::value::Value::Nil };
    (#t) => { $crate::value::Value::True };
    (#f) => { $crate::value::Value::False };

    ( ($($tt:tt)+) ) => {
        scheme!(@list () $($tt)+)
    };

    ( $first:tt, $($rest:tt)* ) => {
        scheme!(@list (scheme!($first)), $($rest)+ )
    };

    // Done with trailing comma.
    (@list ($($elems:expr,)*)) => {
        $crate::value::Value::from_vec(vec![$($elems,)*])
    };

    // Done without trailing comma.
    (@list ($($elems:expr),*)) => {
        $crate::value::Value::from_vec(vec![$($elems),*])
    };

    // Next element is `#t`.
    (@list ($($elems:expr,)*) #t $($tail:tt)*) => {
        scheme!(@list ($($elems,)* scheme!(#t),) $($tail)*)
    };

    // Next element is `#f`.
    (@list ($($elems:expr,)*) #f $($tail:tt)*) => {
        scheme!(@list ($($elems,)* scheme!(#f),) $($tail)*)
    };

    // Next element is a list.
    (@list ($($elems:expr,)*) ($($list:tt)*) $($rest:tt)*) => {
        scheme!(@list ($($elems,)* scheme!(($($list)*)),) $($rest)*)
    };

    // Next element is an identifier followed by comma.
    (@list ($($elems:expr,)*) $next:ident, $($tail:tt)*) => {
        scheme!(@list ($($elems,)* scheme!($next),) $($tail)*)
    };

    // Next element is an identifier.
    (@list ($($elems:expr,)*) $next:ident $($tail:tt)*) => {
        scheme!(@list ($($elems,)* scheme!($next),) $($tail)*)
    };

    // Next element is an explicit expression followed by comma.
    (@list ($($elems:expr,)*) @$next:expr, $($tail:tt)*) => {
        scheme!(@list ($($elems,)* scheme!(@$next),) $($tail)*)
    };

    // Last element is an explicit expression with no trailing comma.
    (@list ($($elems:expr,)*) @$last:expr) => {
        scheme!(@list ($($elems,)* scheme!(@$last)))
    };

    // Comma after the most recent element.
    (@list ($($elems:expr),*) , $($tail:tt)*) => {
        scheme!(@list ($($elems,)*) $($tail)*)
    };

    ($symbol:ident) => {
        $crate::value::Value::symbol(stringify!($symbol))
    };

    (@$other:expr) => {{
        let value: $crate::value::Value = $other.into();
        value
    }};
}
