use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr, Token, parse_macro_input, parse_quote};

/// Entry point for the `#[derive(Reflect)]` macro.
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	match expand(&input) {
		Ok(tokens) => tokens.into(),
		Err(e) => e.to_compile_error().into(),
	}
}

/// One entry of a `#[tag(...)]` attribute.
enum TagArg {
	Skip,
	Decl { key: String, value: LitStr },
}

impl Parse for TagArg {
	fn parse(input: ParseStream) -> syn::Result<Self> {
		// Keys may be keywords such as `mod`.
		let key = input.call(Ident::parse_any)?.unraw();
		if key == "skip" && !input.peek(Token![=]) {
			return Ok(TagArg::Skip);
		}
		input.parse::<Token![=]>()?;
		let value: LitStr = input.parse()?;
		Ok(TagArg::Decl {
			key: key.to_string(),
			value,
		})
	}
}

#[derive(Default)]
struct FieldTags {
	skip: bool,
	decls: Vec<(String, LitStr)>,
}

fn field_tags(field: &Field) -> syn::Result<FieldTags> {
	let mut tags = FieldTags::default();
	for attr in field.attrs.iter().filter(|a| a.path().is_ident("tag")) {
		let args = attr.parse_args_with(Punctuated::<TagArg, Token![,]>::parse_terminated)?;
		for arg in args {
			match arg {
				TagArg::Skip => tags.skip = true,
				TagArg::Decl { key, value } => {
					if tags.decls.iter().any(|(existing, _)| *existing == key) {
						return Err(syn::Error::new_spanned(
							&value,
							format!("duplicate tag key '{key}'"),
						));
					}
					tags.decls.push((key, value));
				}
			}
		}
	}
	Ok(tags)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
	let Data::Struct(data) = &input.data else {
		return Err(syn::Error::new_spanned(
			&input.ident,
			"Reflect can only be derived for structs",
		));
	};

	let ident = &input.ident;
	let name = ident.unraw().to_string();

	let mut descriptors = Vec::new();
	let mut accessors = Vec::new();
	let mut zero_checks = Vec::new();

	let fields: Vec<&Field> = match &data.fields {
		Fields::Named(named) => named.named.iter().collect(),
		Fields::Unnamed(unnamed) => unnamed.unnamed.iter().collect(),
		Fields::Unit => Vec::new(),
	};

	for (position, field) in fields.into_iter().enumerate() {
		let tags = field_tags(field)?;
		if tags.skip {
			continue;
		}

		let (member, field_name) = match &field.ident {
			Some(field_ident) => (quote!(#field_ident), field_ident.unraw().to_string()),
			None => {
				let index = syn::Index::from(position);
				(quote!(#index), position.to_string())
			}
		};

		let decls = tags.decls.iter().map(|(key, value)| {
			quote!(::remold::TagDecl { key: #key, value: #value })
		});
		descriptors.push(quote! {
			::remold::FieldDescriptor { name: #field_name, tags: &[#(#decls),*] }
		});

		let ordinal = accessors.len();
		accessors.push(quote! {
			#ordinal => ::core::option::Option::Some(&mut self.#member as &mut dyn ::remold::Reflect)
		});
		zero_checks.push(quote!(::remold::Reflect::is_zero(&self.#member)));
	}

	let mut generics = input.generics.clone();
	for param in generics.type_params_mut() {
		param.bounds.push(parse_quote!(::remold::Reflect));
	}
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	Ok(quote! {
		const _: () = {
			static DESCRIPTOR: ::remold::StructDescriptor = ::remold::StructDescriptor {
				name: #name,
				fields: &[#(#descriptors),*],
			};

			impl #impl_generics ::remold::Reflect for #ident #ty_generics #where_clause {
				fn static_kind() -> ::remold::Kind {
					::remold::Kind::Struct
				}

				fn shape_mut(&mut self) -> ::remold::ShapeMut<'_> {
					::remold::ShapeMut::Struct(self)
				}

				fn is_zero(&self) -> bool {
					true #(&& #zero_checks)*
				}
			}

			impl #impl_generics ::remold::StructAccess for #ident #ty_generics #where_clause {
				fn descriptor(&self) -> &'static ::remold::StructDescriptor {
					&DESCRIPTOR
				}

				#[allow(clippy::match_single_binding)]
				fn field_mut(
					&mut self,
					index: usize,
				) -> ::core::option::Option<&mut dyn ::remold::Reflect> {
					match index {
						#(#accessors,)*
						_ => ::core::option::Option::None,
					}
				}
			}
		};
	})
}
