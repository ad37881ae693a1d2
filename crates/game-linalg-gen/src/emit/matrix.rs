use proc_macro2::{Literal, Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Item, LitStr};

use super::{braced, check, emission_error, parse_items, usize_lit};
use crate::{
    rules::{
        Capability, Equality, Family, MatrixPlan, MATRIX_UNIFORM_COUNT, MATRIX_UNIFORM_TRANSPOSE,
    },
    Error, Options,
};

/// Emits the struct and impls of one square matrix type.
///
/// The paired vector type is referred to by name only; it does not have to be emitted first.
pub fn emit_matrix(plan: &MatrixPlan, options: &Options) -> Result<Vec<Item>, Error> {
    check(&plan.name, Family::Matrix, plan.kind, &plan.capabilities)?;
    if plan.identity.len() != plan.cardinality() {
        return Err(emission_error(
            &plan.name,
            format!(
                "identity has {} elements, expected {}",
                plan.identity.len(),
                plan.cardinality()
            ),
        ));
    }

    let name = format_ident!("{}", plan.name);
    let scalar = format_ident!("{}", plan.scalar);
    let dim = usize_lit(plan.dimension);
    let card = usize_lit(plan.cardinality());
    let indices = (0..plan.cardinality()).map(usize_lit).collect::<Vec<_>>();
    let zero = plan.zero;

    let mut decl = TokenStream::new();
    let mut methods = TokenStream::new();
    let mut impls = TokenStream::new();

    for cap in plan.capabilities.iter() {
        match cap {
            Capability::Storage => {
                let doc = format!(
                    " A {0}×{0} matrix of [`{1}`] values, stored in row-major order.",
                    plan.dimension, plan.scalar
                );
                decl.extend(quote! {
                    #[doc = #doc]
                    #[derive(Debug, Default, Clone, Copy)]
                    #[repr(C)]
                    pub struct #name {
                        /// Elements in row-major order: element `(row, col)` is at
                        /// `row * DIMENSION + col`.
                        pub v: [#scalar; #card],
                    }

                    unsafe impl ::bytemuck::Zeroable for #name {}
                    unsafe impl ::bytemuck::Pod for #name {}
                });
                methods.extend(quote! {
                    /// Number of rows and columns.
                    pub const DIMENSION: usize = #dim;
                    /// Number of stored elements.
                    pub const CARDINALITY: usize = #card;
                });
                impls.extend(quote! {
                    impl ::core::convert::From<[#scalar; #card]> for #name {
                        #[inline]
                        fn from(v: [#scalar; #card]) -> Self {
                            Self { v }
                        }
                    }

                    impl ::core::convert::From<#name> for [#scalar; #card] {
                        #[inline]
                        fn from(m: #name) -> Self {
                            m.v
                        }
                    }
                });
            }
            Capability::Construct => methods.extend(quote! {
                /// Creates a matrix from its elements in row-major order.
                #[inline]
                pub const fn from_row_major(v: [#scalar; #card]) -> Self {
                    Self { v }
                }

                /// Creates a matrix with every element set to `value`.
                #[inline]
                pub const fn splat(value: #scalar) -> Self {
                    Self { v: [value; #card] }
                }

                /// Creates a matrix from the leading elements of `values`, in row-major order.
                ///
                /// # Panics
                ///
                /// Panics if `values` is shorter than the number of elements.
                #[inline]
                pub fn from_slice(values: &[#scalar]) -> Self {
                    let mut v = [#zero; #card];
                    v.copy_from_slice(&values[..#card]);
                    Self { v }
                }
            }),
            Capability::Zero => methods.extend(quote! {
                /// The matrix with every element set to zero.
                pub const ZERO: Self = Self { v: [#zero; #card] };

                #[inline]
                pub fn zero() -> Self {
                    Self::ZERO
                }
            }),
            Capability::Identity => {
                let identity = &plan.identity;
                methods.extend(quote! {
                    /// The identity matrix.
                    pub const IDENTITY: Self = Self { v: [#(#identity),*] };

                    #[inline]
                    pub fn identity() -> Self {
                        Self::IDENTITY
                    }
                });
            }
            Capability::Add => impls.extend(quote! {
                impl ops::Add for #name {
                    type Output = Self;

                    #[inline]
                    fn add(mut self, rhs: Self) -> Self {
                        for (a, b) in self.v.iter_mut().zip(rhs.v) {
                            *a += b;
                        }
                        self
                    }
                }
            }),
            Capability::AddAssign => impls.extend(quote! {
                impl ops::AddAssign for #name {
                    #[inline]
                    fn add_assign(&mut self, rhs: Self) {
                        for (a, b) in self.v.iter_mut().zip(rhs.v) {
                            *a += b;
                        }
                    }
                }
            }),
            Capability::Sub => impls.extend(quote! {
                impl ops::Sub for #name {
                    type Output = Self;

                    #[inline]
                    fn sub(mut self, rhs: Self) -> Self {
                        for (a, b) in self.v.iter_mut().zip(rhs.v) {
                            *a -= b;
                        }
                        self
                    }
                }
            }),
            Capability::SubAssign => impls.extend(quote! {
                impl ops::SubAssign for #name {
                    #[inline]
                    fn sub_assign(&mut self, rhs: Self) {
                        for (a, b) in self.v.iter_mut().zip(rhs.v) {
                            *a -= b;
                        }
                    }
                }
            }),
            Capability::Neg => impls.extend(quote! {
                impl ops::Neg for #name {
                    type Output = Self;

                    #[inline]
                    fn neg(self) -> Self {
                        Self { v: self.v.map(|c| -c) }
                    }
                }
            }),
            Capability::ScalarMul => impls.extend(quote! {
                impl ops::Mul<#scalar> for #name {
                    type Output = Self;

                    #[inline]
                    fn mul(self, rhs: #scalar) -> Self {
                        Self { v: self.v.map(|c| c * rhs) }
                    }
                }
            }),
            Capability::ScalarMulAssign => impls.extend(quote! {
                impl ops::MulAssign<#scalar> for #name {
                    #[inline]
                    fn mul_assign(&mut self, rhs: #scalar) {
                        for c in &mut self.v {
                            *c *= rhs;
                        }
                    }
                }
            }),
            Capability::ElementAccess => {
                methods.extend(quote! {
                    /// Returns the element in row `row` and column `col`.
                    #[inline]
                    pub fn val(&self, row: usize, col: usize) -> #scalar {
                        self.v[row * #dim + col]
                    }

                    /// Returns a mutable reference to the element in row `row` and column `col`.
                    #[inline]
                    pub fn val_mut(&mut self, row: usize, col: usize) -> &mut #scalar {
                        &mut self.v[row * #dim + col]
                    }
                });
                impls.extend(quote! {
                    impl ops::Index<(usize, usize)> for #name {
                        type Output = #scalar;

                        #[inline]
                        fn index(&self, (row, col): (usize, usize)) -> &#scalar {
                            &self.v[row * #dim + col]
                        }
                    }

                    impl ops::IndexMut<(usize, usize)> for #name {
                        #[inline]
                        fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut #scalar {
                            &mut self.v[row * #dim + col]
                        }
                    }
                });
            }
            Capability::MatrixVectorMul => {
                let vector = format_ident!("{}", plan.vector);
                impls.extend(quote! {
                    impl ops::Mul<#vector> for #name {
                        type Output = #vector;

                        /// Multiplies the column vector `rhs` by this matrix: component `i` of the
                        /// result is the dot product of row `i` with `rhs`.
                        #[inline]
                        fn mul(self, rhs: #vector) -> #vector {
                            let mut result = <#vector as ::core::default::Default>::default();
                            for row in 0..#dim {
                                let mut acc = #zero;
                                for col in 0..#dim {
                                    acc += self.v[row * #dim + col] * rhs[col];
                                }
                                result[row] = acc;
                            }
                            result
                        }
                    }
                });
            }
            Capability::MatrixMul => impls.extend(quote! {
                impl ops::Mul for #name {
                    type Output = Self;

                    #[inline]
                    fn mul(self, rhs: Self) -> Self {
                        let mut v = [#zero; #card];
                        for row in 0..#dim {
                            for col in 0..#dim {
                                let mut acc = #zero;
                                for k in 0..#dim {
                                    acc += self.v[row * #dim + k] * rhs.v[k * #dim + col];
                                }
                                v[row * #dim + col] = acc;
                            }
                        }
                        Self { v }
                    }
                }
            }),
            Capability::MatrixMulAssign => impls.extend(quote! {
                impl ops::MulAssign for #name {
                    #[inline]
                    fn mul_assign(&mut self, rhs: Self) {
                        *self = *self * rhs;
                    }
                }
            }),
            Capability::Equality => {
                let tolerance = plan.tolerance;
                let eq = match plan.equality {
                    Equality::Exact => quote!(self.v == rhs.v),
                    Equality::Tolerance => quote! {
                        self.v
                            .iter()
                            .zip(rhs.v.iter())
                            .all(|(a, b)| (a - b).abs() <= Self::EPSILON)
                    },
                };
                methods.extend(quote! {
                    /// Largest per-element difference for which `==` considers matrices equal.
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
                            #approx::ApproxEq::abs_diff_eq(&self.v, &other.v, abs_tolerance)
                        }
                    }
                });
            }
            Capability::Format => {
                let row = braced((0..plan.dimension).map(|_| plan.format_token));
                let format = LitStr::new(
                    &braced((0..plan.dimension).map(|_| &row)),
                    Span::call_site(),
                );
                impls.extend(quote! {
                    impl fmt::Display for #name {
                        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                            write!(f, #format, #(self.v[#indices]),*)
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
                let count = Literal::i32_unsuffixed(MATRIX_UNIFORM_COUNT);
                let transpose = if MATRIX_UNIFORM_TRANSPOSE {
                    quote!(#gl::TRUE)
                } else {
                    quote!(#gl::FALSE)
                };
                let doc = format!(
                    " Uploads this matrix to the uniform at `location` of the current program, via `{}`.",
                    plan.uniform_entry_point
                );
                let (cast_doc, body) = match plan.uniform_cast {
                    Some(ty) => {
                        let doc = format!(" Elements are converted to `{ty}` first.");
                        let ty = format_ident!("{}", ty);
                        (
                            Some(quote!(#[doc = ""] #[doc = #doc])),
                            quote! {
                                let converted = self.v.map(|c| c as #ty);
                                #gl::#entry(location, #count, #transpose, converted.as_ptr());
                            },
                        )
                    }
                    None => (
                        None,
                        quote! {
                            #gl::#entry(location, #count, #transpose, self.v.as_ptr());
                        },
                    ),
                };
                methods.extend(quote! {
                    #[doc = #doc]
                    ///
                    /// The row-major storage is passed with the transpose flag set, so the
                    /// uniform receives the same matrix in column-major order.
                    #cast_doc
                    ///
                    /// # Safety
                    ///
                    /// A GL context must be current on the calling thread, and the GL function
                    /// pointers must have been loaded.
                    #[inline]
                    pub unsafe fn as_uniform(&self, location: #gl::types::GLint) {
                        #body
                    }
                });
            }
            Capability::ScalarDiv
            | Capability::Dot
            | Capability::Length2
            | Capability::Length
            | Capability::Normalize
            | Capability::Cross => {
                // rejected by `check`
                return Err(emission_error(
                    &plan.name,
                    format!("`{cap}` cannot be emitted for a matrix"),
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
        },
    )
}

#[cfg(test)]
mod tests {
    use quote::ToTokens;

    use crate::{
        catalog::{Dimension, MatrixSpec, ScalarKind, VectorCatalog},
        rules::resolve_matrix,
    };

    use super::*;

    fn plan(kind: ScalarKind, dim: Dimension) -> MatrixPlan {
        resolve_matrix(&MatrixSpec::new(kind, dim), &VectorCatalog::standard()).unwrap()
    }

    fn render(plan: &MatrixPlan) -> String {
        emit_matrix(plan, &Options::default())
            .unwrap()
            .iter()
            .map(|item| item.to_token_stream().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn multiplies_with_paired_vector() {
        let code = render(&plan(ScalarKind::WideFloat, Dimension::THREE));
        assert!(code.contains("impl ops :: Mul < DVec3 > for DMat3x3"), "{code}");
        assert!(code.contains("type Output = DVec3"), "{code}");
    }

    #[test]
    fn identity_literal() {
        let code = render(&plan(ScalarKind::Integer, Dimension::TWO));
        assert!(
            code.contains("pub const IDENTITY : Self = Self { v : [1 , 0 , 0 , 1] }"),
            "{code}"
        );
    }

    #[test]
    fn uniform_upload() {
        let code = render(&plan(ScalarKind::NarrowFloat, Dimension::FOUR));
        assert!(
            code.contains("gl :: UniformMatrix4fv (location , 1 , gl :: TRUE , self . v . as_ptr ())"),
            "{code}"
        );

        let code = render(&plan(ScalarKind::Integer, Dimension::THREE));
        assert!(code.contains("c as f32"), "{code}");
        assert!(
            code.contains("gl :: UniformMatrix3fv (location , 1 , gl :: TRUE , converted . as_ptr ())"),
            "{code}"
        );
    }

    #[test]
    fn vector_capability_fails() {
        let mut plan = plan(ScalarKind::NarrowFloat, Dimension::THREE);
        plan.capabilities.insert(Capability::Cross);
        let err = emit_matrix(&plan, &Options::default()).unwrap_err();
        assert!(matches!(err, Error::Emission { .. }), "{err}");
    }

    #[test]
    fn malformed_identity_fails() {
        let mut plan = plan(ScalarKind::NarrowFloat, Dimension::THREE);
        plan.identity.pop();
        assert!(emit_matrix(&plan, &Options::default()).is_err());
    }

    #[test]
    fn custom_gl_module() {
        let options = Options {
            gl: syn::parse_quote!(crate::glad),
            ..Options::default()
        };
        let plan = plan(ScalarKind::WideFloat, Dimension::TWO);
        let code = emit_matrix(&plan, &options)
            .unwrap()
            .iter()
            .map(|item| item.to_token_stream().to_string())
            .collect::<String>();
        assert!(code.contains("crate :: glad :: UniformMatrix2dv"), "{code}");
        assert!(code.contains("location : crate :: glad :: types :: GLint"), "{code}");
    }
}
