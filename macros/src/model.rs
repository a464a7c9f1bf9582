use darling::{ast, FromDeriveInput, FromField, FromMeta};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::{punctuated::Punctuated, Meta, Token};

#[derive(Debug, Default, FromMeta)]
struct ModelArgs {
	/// Skips generating the `CreateXInput` struct.
	#[darling(default)]
	no_create: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

/// Row mapping only applies to the model itself, never to its input structs.
fn is_row_only(path: &syn::Path) -> bool {
	path.segments
		.last()
		.is_some_and(|segment| segment.ident == "FromRow")
}

/// Copies struct attributes onto an input struct, dropping `sqlx` attributes
/// and `FromRow` derives.
fn input_attrs(attrs: &[syn::Attribute]) -> syn::Result<Vec<proc_macro2::TokenStream>> {
	let mut output = Vec::with_capacity(attrs.len());

	for attr in attrs {
		if attr.path().is_ident("sqlx") {
			continue;
		}

		if attr.path().is_ident("derive") {
			let paths =
				attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)?;
			let paths = paths.iter().filter(|path| !is_row_only(path));

			output.push(quote!(#[derive(#(#paths),*)]));
			continue;
		}

		output.push(attr.to_token_stream());
	}

	Ok(output)
}

fn is_option(ty: &syn::Type) -> bool {
	let syn::Type::Path(path) = ty else {
		return false;
	};

	path.qself.is_none()
		&& path
			.path
			.segments
			.last()
			.is_some_and(|segment| segment.ident == "Option")
}

pub fn from_input(
	args: proc_macro::TokenStream,
	input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match ModelArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let create_ident = format_ident!("Create{}Input", ident);
	let update_ident = format_ident!("Update{}Input", ident);

	let attrs = match input_attrs(&receiver.attrs) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let fields = receiver.data.take_struct().expect("expected struct");
	let fields = fields
		.iter()
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;
			let ty = &field.ty;
			let vis = &field.vis;

			// Skip fields with #[serde(skip_deserializing)] or #[serde(skip)]
			if field.attrs.iter().any(|attr| {
				let Meta::List(ref list) = attr.meta else {
					return false;
				};

				if !list.path.is_ident("serde") {
					return false;
				}

				list.tokens.to_token_stream().into_iter().any(|token| {
					matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
				})
			}) {
				return None;
			}

			let attrs = field
				.attrs
				.iter()
				.filter(|attr| !attr.path().is_ident("sqlx"))
				.collect::<Vec<_>>();

			Some((attrs, ident, ty, vis))
		})
		.collect::<Vec<_>>();

	let create = (!args.no_create).then(|| {
		let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
			quote! {
				#(#attrs)*
				#vis #ident: #ty,
			}
		});

		quote! {
			#(#attrs)*
			#vis struct #create_ident #generics {
				#(
					#create_fields
				)*
			}
		}
	});

	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		let ty = if is_option(ty) {
			quote!(#ty)
		} else {
			quote!(Option<#ty>)
		};

		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	quote! {
		#input

		#create

		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}
