extern crate proc_macro;

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, Attribute, Expr, Fields, FnArg, GenericArgument, Ident, ItemFn, ItemStruct,
    LitStr, PathArguments, Result, ReturnType, Token, Type,
};

const METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH"];

// --- #[api] ---

struct ApiMacroArgs {
    method: Option<Ident>,
    path: LitStr,
}

impl Parse for ApiMacroArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(ApiMacroArgs {
                method: None,
                path: input.parse()?,
            });
        }
        let method: Ident = input.parse()?;
        input.parse::<Token![,]>()?;
        let path: LitStr = input.parse()?;
        Ok(ApiMacroArgs {
            method: Some(method),
            path,
        })
    }
}

/// Registers a handler with the exporter.
///
/// ```ignore
/// /// Creates a post
/// #[api(POST, "/post")]
/// async fn add_post(ctx: Context, req: AddPost) -> Result<Post, AppError> { ... }
/// ```
///
/// The method may be omitted (`#[api("/post")]`), in which case it defaults to `POST`. The first
/// doc line becomes the description. The handler's shape is checked when the exporter is built.
#[proc_macro_attribute]
pub fn api(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemFn);
    let args_parsed = parse_macro_input!(args as ApiMacroArgs);
    match expand_api(args_parsed, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_api(args: ApiMacroArgs, item: ItemFn) -> Result<TokenStream2> {
    let method = match &args.method {
        Some(ident) => {
            let method = ident.to_string().to_uppercase();
            if !METHODS.contains(&method.as_str()) {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unsupported HTTP method `{ident}`, expected one of {METHODS:?}"),
                ));
            }
            method
        }
        None => String::new(),
    };
    let path = args.path;

    let fn_name = &item.sig.ident;
    let operation_id = fn_name.to_string();
    let (summary, _description) = parse_doc_comments(&item.attrs);
    let display = item.sig.to_token_stream().to_string();

    let mut inputs = Vec::new();
    for arg in &item.sig.inputs {
        // Receivers are not part of the wire contract.
        if let FnArg::Typed(pat_type) = arg {
            inputs.push(describe_type(&pat_type.ty));
        }
    }

    let outputs = match &item.sig.output {
        ReturnType::Default => Vec::new(),
        ReturnType::Type(_, ty) => match result_parts(ty) {
            Some((ok, err)) => {
                let mut outputs = Vec::new();
                if !is_unit(ok) {
                    outputs.push(describe_type(ok));
                }
                let err_name = err
                    .map(|e| e.to_token_stream().to_string())
                    .unwrap_or_else(|| "Error".to_string());
                outputs.push(quote! { ::sdk_kit::TypeDesc::error(#err_name) });
                outputs
            }
            None if is_unit(ty) => Vec::new(),
            None => vec![describe_type(ty)],
        },
    };

    let signature_fn = format_ident!("__sdk_kit_signature_{}", fn_name);

    Ok(quote! {
        #item

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #signature_fn() -> ::sdk_kit::HandlerSignature {
            ::sdk_kit::HandlerSignature::new(#display)
                #( .input(#inputs) )*
                #( .output(#outputs) )*
        }

        ::sdk_kit::inventory::submit! {
            ::sdk_kit::ApiRoute {
                operation_id: #operation_id,
                method: #method,
                path: #path,
                description: #summary,
                signature: #signature_fn,
            }
        }
    })
}

/// Descriptor expression for a parameter or return type. References are treated as pointers.
fn describe_type(ty: &Type) -> TokenStream2 {
    match ty {
        Type::Reference(reference) => {
            let inner = &reference.elem;
            quote! { ::sdk_kit::TypeDesc::pointer(<#inner as ::sdk_kit::Reflect>::describe) }
        }
        Type::Paren(paren) => describe_type(&paren.elem),
        _ => quote! { <#ty as ::sdk_kit::Reflect>::describe() },
    }
}

/// Splits `Result<T, E>` into `T` and `E`. A one-argument `Result<T>` alias has no `E`.
fn result_parts(ty: &Type) -> Option<(&Type, Option<&Type>)> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    });
    let ok = types.next()?;
    Some((ok, types.next()))
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// Parses doc comments (`///` and `/** ... */`) into a summary and description.
fn parse_doc_comments(attrs: &[Attribute]) -> (String, String) {
    let doc_comments: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if attr.path().is_ident("doc") {
                if let syn::Meta::NameValue(nv) = &attr.meta {
                    if let syn::Expr::Lit(expr_lit) = &nv.value {
                        if let syn::Lit::Str(lit) = &expr_lit.lit {
                            return Some(lit.value().trim().to_string());
                        }
                    }
                }
            }
            None
        })
        .collect();

    let description = doc_comments
        .iter()
        .filter(|line| !line.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let summary = doc_comments.first().cloned().unwrap_or_default();
    (summary, description)
}

// --- #[api_dto] ---

#[derive(Clone, Copy)]
enum RenameRule {
    None,
    Camel,
    Snake,
    Pascal,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn from_lit(lit: &LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "none" => RenameRule::None,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "PascalCase" => RenameRule::Pascal,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            other => {
                return Err(syn::Error::new(
                    lit.span(),
                    format!("unknown rename_all rule `{other}`"),
                ))
            }
        })
    }

    fn apply(self, name: &str) -> String {
        match self {
            RenameRule::None => name.to_string(),
            RenameRule::Camel => name.to_lower_camel_case(),
            RenameRule::Snake => name.to_snake_case(),
            RenameRule::Pascal => name.to_upper_camel_case(),
            RenameRule::ScreamingSnake => name.to_shouty_snake_case(),
            RenameRule::Kebab => name.to_kebab_case(),
        }
    }
}

#[derive(Default)]
struct FieldOptions {
    label: Option<LitStr>,
    rename: Option<LitStr>,
    required: bool,
    min: Option<Expr>,
    max: Option<Expr>,
    enums: Vec<LitStr>,
    skip: bool,
}

/// Derives `Debug`, `Clone`, serde and `sdk_kit::Reflect` for a DTO struct.
///
/// Wire names default to camelCase; `#[api_dto(rename_all = "snake_case")]` changes the rule.
/// Members accept `#[field(label = "...", required, min = N, max = N, enums("a", "b"), skip,
/// rename = "...")]`, and their doc comments become descriptions. `skip` hides a member from
/// the generated SDKs only; `#[serde(skip)]` hides it from both.
#[proc_macro_attribute]
pub fn api_dto(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut rule = RenameRule::Camel;
    let rule_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("rename_all") {
            rule = RenameRule::from_lit(&meta.value()?.parse()?)?;
            Ok(())
        } else {
            Err(meta.error("unsupported api_dto argument, expected `rename_all`"))
        }
    });
    parse_macro_input!(args with rule_parser);
    let item = parse_macro_input!(input as ItemStruct);
    match expand_api_dto(rule, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_api_dto(rule: RenameRule, mut item: ItemStruct) -> Result<TokenStream2> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "api_dto does not support generic structs",
        ));
    }
    let Fields::Named(named) = &mut item.fields else {
        return Err(syn::Error::new_spanned(
            &item.ident,
            "api_dto requires a struct with named fields",
        ));
    };

    let mut members = Vec::new();
    for field in named.named.iter_mut() {
        let options = take_field_options(&mut field.attrs)?;
        let serde = inspect_serde(&field.attrs)?;
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(&field.ty, "expected a named field"))?;
        let name = ident.unraw().to_string();

        let param = match (&serde.rename, &options.rename) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rename)) => rename.value(),
            (None, None) => rule.apply(&name),
        };
        if serde.rename.is_none() {
            field.attrs.push(syn::parse_quote!(#[serde(rename = #param)]));
        }

        let (_, description) = parse_doc_comments(&field.attrs);
        let ty = &field.ty;
        let mut member = quote! {
            ::sdk_kit::MemberDesc::new(#name, <#ty as ::sdk_kit::Reflect>::describe).param(#param)
        };
        if let Some(label) = &options.label {
            member.extend(quote! { .label(#label) });
        }
        if !description.is_empty() {
            member.extend(quote! { .description(#description) });
        }
        if options.required {
            member.extend(quote! { .required() });
        }
        if let Some(min) = &options.min {
            member.extend(quote! { .min(#min) });
        }
        if let Some(max) = &options.max {
            member.extend(quote! { .max(#max) });
        }
        if !options.enums.is_empty() {
            let enums = &options.enums;
            member.extend(quote! { .enums(&[#(#enums),*]) });
        }
        if options.skip || serde.skip {
            member.extend(quote! { .skip() });
        }
        members.push(member);
    }

    let ident = &item.ident;
    let type_name = ident.to_string();
    let (_, description) = parse_doc_comments(&item.attrs);

    Ok(quote! {
        #[derive(
            ::core::fmt::Debug,
            ::core::clone::Clone,
            ::sdk_kit::serde::Serialize,
            ::sdk_kit::serde::Deserialize
        )]
        #[serde(crate = "::sdk_kit::serde")]
        #item

        impl ::sdk_kit::Reflect for #ident {
            fn describe() -> ::sdk_kit::TypeDesc {
                ::sdk_kit::TypeDesc::structure(
                    ::sdk_kit::TypeIdentity::new(::core::module_path!(), #type_name),
                    ::std::vec![#(#members),*],
                )
                .with_description(#description)
            }
        }
    })
}

/// Removes `#[field(...)]` attributes and collects their options.
fn take_field_options(attrs: &mut Vec<Attribute>) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();
    let mut error = None;
    attrs.retain(|attr| {
        if !attr.path().is_ident("field") {
            return true;
        }
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("label") {
                options.label = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("rename") {
                options.rename = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("required") {
                options.required = true;
            } else if meta.path.is_ident("min") {
                options.min = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("max") {
                options.max = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("enums") {
                let content;
                syn::parenthesized!(content in meta.input);
                let values = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                options.enums.extend(values);
            } else {
                return Err(meta.error("unsupported field option"));
            }
            Ok(())
        });
        if let Err(err) = parsed {
            error.get_or_insert(err);
        }
        false
    });
    match error {
        Some(err) => Err(err),
        None => Ok(options),
    }
}

#[derive(Default)]
struct SerdeOptions {
    rename: Option<String>,
    skip: bool,
}

/// Reads the serde attributes that change the wire name or drop the member.
fn inspect_serde(attrs: &[Attribute]) -> Result<SerdeOptions> {
    let mut options = SerdeOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                options.rename = Some(lit.value());
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<TokenStream2>()?;
            }
            Ok(())
        })?;
    }
    Ok(options)
}
