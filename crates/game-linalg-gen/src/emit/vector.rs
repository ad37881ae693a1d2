use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Item, LitStr};

use super::{braced, check, emission_error, parse_items, usize_lit};
use crate::{
    rules::{Capability, Equality, Family, VectorPlan},
    Error, Options,
};

/// Emits the struct, impls and constructor function of one vector type.
pub fn emit_vector(plan: &VectorPlan, options: &Options) -> Result<Vec<Item>, Error> {
    check(&plan.name, Family::Vector, plan.kind, &plan.capabilities)?;

    let name = format_ident!("{}", plan.name);
    let scalar = format_ident!("{}", plan.scalar);
    let fields = plan
        .components
        .iter()
        .map(|c| format_ident!("{}", c))
        .collect::<Vec<_>>();
    let indices = (0..fields.len()).map(usize_lit).collect::<Vec<_>>();
    let n = usize_lit(fields.len());

    let mut decl = TokenStream::new();
    let mut methods = TokenStream::new();
    let mut impls = TokenStream::new();
    let mut free = TokenStream::new();

    for cap in plan.capabilities.iter() {
        match cap {
            Capability::Storage => {
                let doc = format!(
                    " A {}-component vector of [`{}`] values.",
                    fields.len(),
                    plan.scalar
                );
                decl.extend(quote! {
                    #[doc = #doc]
                    #[derive(Debug, Default, Clone, Copy)]
                    #[repr(C)]
                    pub struct #name {
                        #( pub #fields: #scalar, )*
                    }

                    unsafe impl ::bytemuck::Zeroable for #name {}
                    unsafe impl ::bytemuck::Pod for #name {}
                });
                methods.extend(quote! {
                    /// Number of components.
                    pub const CARDINALITY: usize = #n;

                    /// Returns the components as an array, in declaration order.
                    #[inline]
                    pub fn as_array(&self) -> &[#scalar; #n] {
                        ::bytemuck::cast_ref(self)
                    }

                    /// Returns the components as a mutable array, in declaration order.
                    #[inline]
                    pub fn as_mut_array(&mut self) -> &mut [#scalar; #n] {
                        ::bytemuck::cast_mut(self)
                    }
                });
                impls.extend(quote! {
                    impl ::core::convert::From<[#scalar; #n]> for #name {
                        #[inline]
                        fn from([#(#fields),*]: [#scalar; #n]) -> Self {
                            Self { #(#fields),* }
                        }
                    }

                    impl ::core::convert::From<#name> for [#scalar; #n] {
                        #[inline]
                        fn from(v: #name) -> Self {
                            [#(v.#fields),*]
                        }
                    }

                    impl ops::Index<usize> for #name {
                        type Output = #scalar;

                        #[inline]
                        fn index(&self, index: usize) -> &#scalar {
                            &self.as_array()[index]
                        }
                    }

                    impl ops::IndexMut<usize> for #name {
                        #[inline]
                        fn index_mut(&mut self, index: usize) -> &mut #scalar {
                            &mut self.as_mut_array()[index]
                        }
                    }
                });
            }
            Capability::Construct => {
                let constructor = format_ident!("{}", plan.constructor);
                let doc = format!(" Creates a [`{}`] from its components.", plan.name);
                methods.extend(quote! {
                    /// Creates a vector from its components.
                    #[inline]
                    pub const fn new(#(#fields: #scalar),*) -> Self {
                        Self { #(#fields),* }
                    }

                    /// Creates a vector with every component set to `value`.
                    #[inline]
                    pub const fn splat(value: #scalar) -> Self {
                        Self { #(#fields: value),* }
                    }

                    /// Creates a vector from the leading elements of `values`.
                    ///
                    /// # Panics
                    ///
                    /// Panics if `values` is shorter than the number of components.
                    #[inline]
                    pub fn from_slice(values: &[#scalar]) -> Self {
                        Self { #(#fields: values[#indices]),* }
                    }
                });
                free.extend(quote! {
                    #[doc = #doc]
                    #[inline]
                    pub const fn #constructor(#(#fields: #scalar),*) -> #name {
                        #name::new(#(#fields),*)
                    }
                });
            }
            Capability::Zero => {
                let zero = plan.zero;
                methods.extend(quote! {
                    /// The vector with every component set to zero.
                    pub const ZERO: Self = Self { #(#fields: #zero),* };

                    #[inline]
                    pub fn zero() -> Self {
                        Self::ZERO
                    }
                });
            }
            Capability::Add => impls.extend(quote! {
                impl ops::Add for #name {
                    type Output = Self;

                    #[inline]
                    fn add(self, rhs: Self) -> Self {
                        Self { #(#fields: self.#fields + rhs.#fields),* }
                    }
                }
            }),
            Capability::AddAssign => impls.extend(quote! {
                impl ops::AddAssign for #name {
                    #[inline]
                    fn add_assign(&mut self, rhs: Self) {
                        #( self.#fields += rhs.#fields; )*
                    }
                }
            }),
            Capability::Sub => impls.extend(quote! {
                impl ops::Sub for #name {
                    type Output = Self;

                    #[inline]
                    fn sub(self, rhs: Self) -> Self {
                        Self { #(#fields: self.#fields - rhs.#fields),* }
                    }
                }
            }),
            Capability::SubAssign => impls.extend(quote! {
                impl ops::SubAssign for #name {
                    #[inline]
                    fn sub_assign(&mut self, rhs: Self) {
                        #( self.#fields -= rhs.#fields; )*
                    }
                }
            }),
            Capability::Neg => impls.extend(quote! {
                impl ops::Neg for #name {
                    type Output = Self;

                    #[inline]
                    fn neg(self) -> Self {
                        Self { #(#fields: -self.#fields),* }
                    }
                }
            }),
            Capability::ScalarMul => impls.extend(quote! {
                impl ops::Mul<#scalar> for #name {
                    type Output = Self;

                    #[inline]
                    fn mul(self, rhs: #scalar) -> Self {
                        Self { #(#fields: self.#fields * rhs),* }
                    }
                }
            }),
            Capability::ScalarMulAssign => impls.extend(quote! {
                impl ops::MulAssign<#scalar> for #name {
                    #[inline]
                    fn mul_assign(&mut self, rhs: #scalar) {
                        #( self.#fields *= rhs; )*
                    }
                }
            }),
            Capability::ScalarDiv => impls.extend(quote! {
                impl ops::Div<#scalar> for #name {
                    type Output = Self;

                    /// Divides every component by `rhs`.
                    ///
                    /// Division by zero is not checked: float components become infinite or NaN,
                    /// integer division by zero panics.
                    #[inline]
                    fn div(self, rhs: #scalar) -> Self {
                        Self { #(#fields: self.#fields / rhs),* }
                    }
                }
            }),
            Capability::Dot => methods.extend(quote! {
                /// Computes the dot product of `self` and `rhs`.
                #[inline]
                pub fn dot(self, rhs: Self) -> #scalar {
                    #(self.#fields * rhs.#fields)+*
                }
            }),
            Capability::Length2 => methods.extend(quote! {
                /// Returns the squared length of this vector.
                #[inline]
                pub fn length2(self) -> #scalar {
                    self.dot(self)
                }
            }),
            Capability::Length => methods.extend(quote! {
                /// Returns the length of this vector.
                #[inline]
                pub fn length(self) -> #scalar {
                    self.length2().sqrt()
                }
            }),
            Capability::Normalize => {
                let one = plan.one;
                methods.extend(quote! {
                    /// Scales this vector to unit length.
                    ///
                    /// The zero vector has no direction; normalizing it is not checked and yields
                    /// NaN components.
                    #[inline]
                    pub fn normalized(self) -> Self {
                        self * (#one / self.length())
                    }
                });
            }
            Capability::Cross => {
                let [x, y, z] = match &fields[..] {
                    [x, y, z] => [x, y, z],
                    _ => {
                        return Err(emission_error(
                            &plan.name,
                            format!(
                                "the cross product needs 3 components, but there are {}",
                                fields.len()
                            ),
                        ))
                    }
                };
                methods.extend(quote! {
                    /// Computes the (right-handed) cross product of `self` and `rhs`.
                    #[inline]
                    pub fn cross(self, rhs: Self) -> Self {
                        Self {
                            #x: self.#y * rhs.#z - self.#z * rhs.#y,
                            #y: self.#z * rhs.#x - self.#x * rhs.#z,
                            #z: self.#x * rhs.#y - self.#y * rhs.#x,
                        }
                    }
                });
            }
            Capability::Equality => {
                let tolerance = plan.tolerance;
                let eq = match plan.equality {
                    Equality::Exact => quote!(#(self.#fields == rhs.#fields)&&*),
                    Equality::Tolerance => {
                        quote!(#((self.#fields - rhs.#fields).abs() <= Self::EPSILON)&&*)
                    }
                };
                methods.extend(quote! {
                    /// Largest per-component difference for which `==` considers vectors equal.
                    pub const EPSILON: #scalar = #tolerance;
                });
                impls.extend(quote! {
                    impl ::core::cmp::PartialEq for #name {
                        #[inline]
                        fn eq(&self, rhs: &Self) -> bool {
                            #eq
                        }
                    }
                });
            }
            Capability::Approx => {
                let approx = &options.approx;
                impls.extend(quote! {
                    impl #approx::ApproxEq for #name {
                        type Tolerance = #scalar;

                        fn abs_diff_eq(&self, other: &Self, abs_tolerance: #scalar) -> bool {
                            #(#approx::ApproxEq::abs_diff_eq(&self.#fields, &other.#fields, abs_tolerance))&&*
                        }
                    }
                });
            }
            Capability::Format => {
                let format = LitStr::new(
                    &braced(fields.iter().map(|_| plan.format_token)),
                    Span::call_site(),
                );
                impls.extend(quote! {
                    impl fmt::Display for #name {
                        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                            write!(f, #format, #(self.#fields),*)
                        }
                    }
                });
                methods.extend(quote! {
                    /// Appends the [`Display`](fmt::Display) representation of `self` to `sink`.
                    pub fn append_to_string(&self, sink: &mut String) {
                        use ::core::fmt::Write as _;
                        // writing to a `String` cannot fail
                        let _ = write!(sink, "{}", self);
                    }
                });
            }
            Capability::UniformUpload => {
                let gl = &options.gl;
                let entry = format_ident!("{}", plan.uniform_entry_point);
                let args = fields
                    .iter()
                    .map(|field| match plan.uniform_cast {
                        Some(ty) => {
                            let ty = format_ident!("{}", ty);
                            quote!(self.#field as #ty)
                        }
                        None => quote!(self.#field),
                    })
                    .collect::<Vec<_>>();
                let doc = format!(
                    " Uploads this vector to the uniform at `location` of the current program, via `{}`.",
                    plan.uniform_entry_point
                );
                let cast_doc = plan.uniform_cast.map(|ty| {
                    let doc = format!(" Components are converted to `{ty}` first.");
                    quote!(#[doc = ""] #[doc = #doc])
                });
                methods.extend(quote! {
                    #[doc = #doc]
                    #cast_doc
                    ///
                    /// # Safety
                    ///
                    /// A GL context must be current on the calling thread, and the GL function
                    /// pointers must have been loaded.
                    #[inline]
                    pub unsafe fn as_uniform(&self, location: #gl::types::GLint) {
                        #gl::#entry(location, #(#args),*);
                    }
                });
            }
            Capability::Identity
            | Capability::ElementAccess
            | Capability::MatrixVectorMul
            | Capability::MatrixMul
            | Capability::MatrixMulAssign => {
                // rejected by `check`
                return Err(emission_error(
                    &plan.name,
                    format!("`{cap}` cannot be emitted for a vector"),
                ));
            }
        }
    }

    parse_items(
        &plan.name,
        quote! {
            #decl

            impl #name {
                #methods
            }

            #impls
            #free
        },
    )
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;

    use crate::{
        catalog::{Dimension, ScalarKind, VectorSpec},
        rules::resolve_vector,
    };

    use super::*;

    fn render(kind: ScalarKind, dim: Dimension) -> String {
        let plan = resolve_vector(&VectorSpec::new(kind, dim));
        let items = emit_vector(&plan, &Options::default()).unwrap();
        items
            .iter()
            .map(|item| item.to_token_stream().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn cross_only_in_three_dimensions() {
        for kind in ScalarKind::ALL {
            for dim in Dimension::ALL {
                let code = render(kind, dim);
                assert_eq!(code.contains("fn cross"), dim.get() == 3, "{kind} {dim}");
            }
        }
    }

    #[test]
    fn length_only_for_floats() {
        for kind in ScalarKind::ALL {
            for dim in Dimension::ALL {
                let code = render(kind, dim);
                let float = kind != ScalarKind::Integer;
                assert_eq!(code.contains("fn length2"), float, "{kind} {dim}");
                assert_eq!(code.contains("fn length ("), float, "{kind} {dim}");
                assert_eq!(code.contains("fn normalized"), float, "{kind} {dim}");
                assert!(code.contains("fn dot"), "{kind} {dim}");
            }
        }
    }

    #[test]
    fn integer_upload_casts_to_float() {
        let code = render(ScalarKind::Integer, Dimension::THREE);
        assert!(code.contains("gl :: Uniform3f"), "{code}");
        assert!(code.contains("self . x as f32"), "{code}");
        assert!(code.contains("self . z as f32"), "{code}");

        let code = render(ScalarKind::WideFloat, Dimension::FOUR);
        assert!(code.contains("gl :: Uniform4d (location , self . x , self . y , self . z , self . w)"), "{code}");
    }

    #[test]
    fn cross_on_two_components_fails() {
        let mut plan = resolve_vector(&VectorSpec::new(ScalarKind::NarrowFloat, Dimension::TWO));
        plan.capabilities.insert(Capability::Cross);
        let err = emit_vector(&plan, &Options::default()).unwrap_err();
        assert!(matches!(err, Error::Emission { .. }), "{err}");
        assert!(err.to_string().contains("FVec2"), "{err}");
    }

    #[test]
    fn equality_modes() {
        let code = render(ScalarKind::Integer, Dimension::TWO);
        assert!(code.contains("self . x == rhs . x && self . y == rhs . y"), "{code}");
        assert!(code.contains("pub const EPSILON : i32 = 0"), "{code}");

        let code = render(ScalarKind::NarrowFloat, Dimension::TWO);
        assert!(code.contains("abs () <= Self :: EPSILON"), "{code}");
        assert!(code.contains("pub const EPSILON : f32 = 0.0000000001"), "{code}");
    }

    #[test]
    fn removed_capability_is_absent() {
        let mut plan = resolve_vector(&VectorSpec::new(ScalarKind::NarrowFloat, Dimension::THREE));
        plan.capabilities.remove(Capability::Normalize);
        plan.capabilities.remove(Capability::UniformUpload);
        let code = emit_vector(&plan, &Options::default())
            .unwrap()
            .iter()
            .map(|item| item.to_token_stream().to_string())
            .collect::<String>();
        assert!(!code.contains("normalized"));
        assert!(!code.contains("as_uniform"));
        assert!(code.contains("fn length"));
    }
}
