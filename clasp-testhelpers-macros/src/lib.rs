//! The `#[clasp_testhelpers::test]` attribute.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    // attributes, visibility and qualifiers before `fn`
    struct Preamble {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    // generics, arguments and return type
    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        items: BraceGroup,
    }

    struct TestFn {
        preamble: Preamble, _fn: KFn, name: Ident,
        signature: Signature, body: Body
    }
}

impl quote::ToTokens for Preamble {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        tokens.extend(self.items.0.stream())
    }
}

/// Marks a test and installs the clasp tracing setup before its body.
///
/// ```ignore
/// #[clasp_testhelpers::test]
/// fn decodes_a_range() {
///     // CLASP_LOG filters the output
/// }
/// ```
///
/// An argument replaces the `#[test]` attribute that is emitted:
///
/// ```ignore
/// #[clasp_testhelpers::test(some_runtime::test)]
/// async fn decodes_later() {}
/// ```
#[proc_macro_attribute]
pub fn test(attr: proc_macro::TokenStream, item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let test_fn = match tokens.parse::<TestFn>() {
        Ok(test_fn) => test_fn,
        Err(_) => {
            return quote::quote! {
                ::core::compile_error!("#[clasp_testhelpers::test] expects a function");
            }
            .into();
        }
    };

    let TestFn {
        preamble,
        _fn,
        name,
        signature,
        body,
    } = test_fn;

    let test_attr = if attr.is_empty() {
        quote::quote! { #[::core::prelude::rust_2024::test] }
    } else {
        let attr = TokenStream::from(attr);
        quote::quote! { #[#attr] }
    };

    quote::quote! {
        #test_attr
        #preamble fn #name #signature {
            ::clasp_testhelpers::setup();

            #body
        }
    }
    .into()
}
