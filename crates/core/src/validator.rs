//! Member eligibility rules
//!
//! Lookup finds members by name; the validator decides whether a found
//! member may actually be used for the operation at hand. All verdicts are
//! booleans: an ineligible member is indistinguishable from a missing one
//! at the accessor surface, and that conflation is deliberate.

use crate::config::TypeMatch;
use crate::describe::{FieldDesc, MethodDesc, ParamSpec};
use crate::value::Value;

/// Applies the eligibility rules under one type-match policy.
#[derive(Debug, Clone, Copy)]
pub struct MemberValidator {
    type_match: TypeMatch,
}

impl MemberValidator {
    pub fn new(type_match: TypeMatch) -> Self {
        Self { type_match }
    }

    /// A field is accessible iff it is public and not type-level.
    pub fn is_valid_field(&self, field: &FieldDesc) -> bool {
        field.modifiers.is_public() && !field.modifiers.is_static()
    }

    /// A method is accessible iff it is public and not type-level.
    pub fn is_valid_method(&self, method: &MethodDesc) -> bool {
        method.modifiers.is_public() && !method.modifiers.is_static()
    }

    /// Whether `method` can act as a setter for `value`.
    ///
    /// A zero-parameter method is always eligible; it is invoked without the
    /// value. A method needing more than one argument cannot be driven by a
    /// single value. Otherwise the first parameter must tolerate the value:
    /// nullable for null, type-accepting for everything else.
    pub fn is_valid_setter_method(&self, method: &MethodDesc, value: &Value) -> bool {
        if !self.is_valid_method(method) {
            return false;
        }

        if method.param_count() == 0 {
            return true;
        }

        if method.required_param_count() > 1 {
            return false;
        }

        if value.is_null() {
            return method.params[0].nullable;
        }

        self.is_valid_parameter_value(&method.params[0], value)
    }

    /// Whether `value` satisfies one declared parameter.
    pub fn is_valid_parameter_value(&self, param: &ParamSpec, value: &Value) -> bool {
        param.ty.accepts(value, self.type_match)
    }

    /// Whether a getter's already-computed return value is presentable.
    ///
    /// The getter is invoked exactly once, by the accessor; this judges the
    /// produced value against the declared return: non-null always passes,
    /// null passes only when the method declares no return type or declares
    /// it nullable.
    pub fn is_valid_getter_return(&self, method: &MethodDesc, value: &Value) -> bool {
        if !self.is_valid_method(method) {
            return false;
        }

        !value.is_null() || method.ret.map_or(true, |ret| ret.nullable)
    }

    /// Whether `args` can drive an invocation of `method`.
    ///
    /// The argument count must reach the method's required parameter count.
    /// Each argument is checked positionally; arguments beyond the declared
    /// parameter list are ignored.
    pub fn are_valid_method_arguments(&self, method: &MethodDesc, args: &[Value]) -> bool {
        if !self.is_valid_method(method) {
            return false;
        }

        if args.len() < method.required_param_count() {
            return false;
        }

        for (arg, param) in args.iter().zip(method.params.iter()) {
            if arg.is_null() {
                if !param.nullable {
                    return false;
                }
                continue;
            }
            if !self.is_valid_parameter_value(param, arg) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{Modifiers, ReturnSpec, TypeSpec};

    fn null_invoke(_: &mut dyn std::any::Any, _: &mut [Value]) -> Value {
        Value::Null
    }

    fn method(modifiers: Modifiers, params: &'static [ParamSpec]) -> MethodDesc {
        MethodDesc {
            name: "m",
            modifiers,
            params,
            ret: None,
            invoke: null_invoke,
        }
    }

    const fn param(ty: TypeSpec, nullable: bool) -> ParamSpec {
        ParamSpec {
            name: "p",
            ty,
            nullable,
            has_default: false,
        }
    }

    static INT_PARAM: [ParamSpec; 1] = [param(TypeSpec::Int, false)];
    static NULLABLE_INT_PARAM: [ParamSpec; 1] = [param(TypeSpec::Int, true)];
    static TWO_INT_PARAMS: [ParamSpec; 2] =
        [param(TypeSpec::Int, false), param(TypeSpec::Int, false)];

    #[test]
    fn test_visibility_and_staticness() {
        let v = MemberValidator::new(TypeMatch::Strict);

        assert!(v.is_valid_method(&method(Modifiers::PUBLIC, &[])));
        assert!(!v.is_valid_method(&method(Modifiers::empty(), &[])));
        assert!(!v.is_valid_method(&method(Modifiers::PUBLIC | Modifiers::STATIC, &[])));
    }

    #[test]
    fn test_setter_zero_params_always_eligible() {
        let v = MemberValidator::new(TypeMatch::Strict);
        let m = method(Modifiers::PUBLIC, &[]);

        assert!(v.is_valid_setter_method(&m, &Value::Int(1)));
        assert!(v.is_valid_setter_method(&m, &Value::Null));
    }

    #[test]
    fn test_setter_rejects_wide_arity() {
        let v = MemberValidator::new(TypeMatch::Strict);
        let m = method(Modifiers::PUBLIC, &TWO_INT_PARAMS);

        assert!(!v.is_valid_setter_method(&m, &Value::Int(1)));
    }

    #[test]
    fn test_setter_null_needs_nullable_param() {
        let v = MemberValidator::new(TypeMatch::Strict);

        let strict = method(Modifiers::PUBLIC, &INT_PARAM);
        assert!(!v.is_valid_setter_method(&strict, &Value::Null));

        let nullable = method(Modifiers::PUBLIC, &NULLABLE_INT_PARAM);
        assert!(v.is_valid_setter_method(&nullable, &Value::Null));
    }

    #[test]
    fn test_setter_type_acceptance() {
        let v = MemberValidator::new(TypeMatch::Strict);
        let m = method(Modifiers::PUBLIC, &INT_PARAM);

        assert!(v.is_valid_setter_method(&m, &Value::Int(23)));
        assert!(!v.is_valid_setter_method(&m, &Value::Str("abc".into())));
        assert!(!v.is_valid_setter_method(&m, &Value::Float(1.0)));
    }

    #[test]
    fn test_getter_return_rules() {
        let v = MemberValidator::new(TypeMatch::Strict);

        let undeclared = method(Modifiers::PUBLIC, &[]);
        assert!(v.is_valid_getter_return(&undeclared, &Value::Null));
        assert!(v.is_valid_getter_return(&undeclared, &Value::Int(1)));

        let mut declared = method(Modifiers::PUBLIC, &[]);
        declared.ret = Some(ReturnSpec {
            ty: TypeSpec::Int,
            nullable: false,
        });
        assert!(!v.is_valid_getter_return(&declared, &Value::Null));
        assert!(v.is_valid_getter_return(&declared, &Value::Int(1)));

        let mut nullable = declared;
        nullable.ret = Some(ReturnSpec {
            ty: TypeSpec::Int,
            nullable: true,
        });
        assert!(v.is_valid_getter_return(&nullable, &Value::Null));
    }

    #[test]
    fn test_method_arguments() {
        let v = MemberValidator::new(TypeMatch::Strict);
        let m = method(Modifiers::PUBLIC, &TWO_INT_PARAMS);

        assert!(v.are_valid_method_arguments(&m, &[Value::Int(1), Value::Int(2)]));
        // Missing required argument.
        assert!(!v.are_valid_method_arguments(&m, &[Value::Int(1)]));
        // Extra arguments are ignored.
        assert!(v.are_valid_method_arguments(
            &m,
            &[Value::Int(1), Value::Int(2), Value::Str("extra".into())]
        ));
        // Positional type mismatch.
        assert!(!v.are_valid_method_arguments(&m, &[Value::Int(1), Value::Str("x".into())]));
        // Null against a non-nullable parameter.
        assert!(!v.are_valid_method_arguments(&m, &[Value::Null, Value::Int(2)]));
    }

    #[test]
    fn test_coercive_mode() {
        let strict = MemberValidator::new(TypeMatch::Strict);
        let coercive = MemberValidator::new(TypeMatch::Coercive);
        static FLOAT_PARAM: [ParamSpec; 1] = [param(TypeSpec::Float, false)];
        let m = method(Modifiers::PUBLIC, &FLOAT_PARAM);

        assert!(!strict.is_valid_setter_method(&m, &Value::Int(1)));
        assert!(coercive.is_valid_setter_method(&m, &Value::Int(1)));
    }
}
