use std::cmp::Ordering;

use sym_rs::context::Context;
use sym_rs::reference::ExprRef;
use sym_rs::types::Truth;

use test_log::test;

#[test]
fn test_sum_is_independent_of_operand_order() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let z = ctx.symbol("z");
    let a = ctx.add_many([x, y, z]);
    let b = ctx.add_many([z, x, y]);
    let c = ctx.add(ctx.add(y, z), x);
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(ctx.hash(a), ctx.hash(b));
}

#[test]
fn test_product_is_independent_of_operand_order() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    assert_eq!(ctx.mul_many([x, y, x]), ctx.mul_many([x, x, y]));
    assert_eq!(ctx.mul_many([x, y, x]), ctx.mul(ctx.pow(x, ctx.integer(2)), y));
}

#[test]
fn test_identities_vanish() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    assert_eq!(ctx.add(x, ctx.zero), x);
    assert_eq!(ctx.mul(ctx.one, x), x);
    assert_eq!(ctx.add_many(Vec::new()), ctx.zero);
    assert_eq!(ctx.mul_many(Vec::new()), ctx.one);
    assert_eq!(ctx.sub(x, x), ctx.zero);
    assert_eq!(ctx.mul(ctx.zero, x), ctx.zero);
}

#[test]
fn test_repeated_terms_collect() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let s = ctx.add_many([x, x, x]);
    assert_eq!(s, ctx.mul(ctx.integer(3), x));
    assert_eq!(ctx.tostr(s), "3*x");
    let t = ctx.add(ctx.mul(ctx.integer(3), x), ctx.mul(ctx.mul(ctx.integer(2), x), ctx.integer(4)));
    assert_eq!(t, ctx.mul(ctx.integer(11), x));
}

#[test]
fn test_powers() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    assert_eq!(ctx.pow(x, ctx.zero), ctx.one);
    assert_eq!(ctx.pow(x, ctx.one), x);
    assert_eq!(ctx.pow(ctx.one, x), ctx.one);
    let x5 = ctx.mul(ctx.pow(x, ctx.integer(3)), ctx.pow(x, ctx.integer(2)));
    assert_eq!(x5, ctx.pow(x, ctx.integer(5)));
    assert_eq!(ctx.div(x5, x5), ctx.one);
    assert_eq!(ctx.pow(ctx.integer(2), ctx.integer(10)), ctx.integer(1024));
}

#[test]
fn test_total_order() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let items: Vec<ExprRef> = vec![
        ctx.integer(2),
        ctx.rational(1, 3).unwrap(),
        ctx.float(0.5),
        ctx.pi(),
        x,
        y,
        ctx.dummy("x"),
        ctx.add(x, y),
        ctx.mul(x, y),
        ctx.pow(x, ctx.integer(2)),
        ctx.interval(ctx.zero, ctx.one),
        ctx.not(ctx.symbol("a")).unwrap(),
        ctx.boolean(true),
    ];
    for &a in &items {
        assert_eq!(ctx.compare(a, a), Ordering::Equal);
        for &b in &items {
            assert_eq!(ctx.compare(a, b), ctx.compare(b, a).reverse());
            if a != b {
                assert_ne!(ctx.compare(a, b), Ordering::Equal);
            }
            for &c in &items {
                if ctx.compare(a, b) == Ordering::Less && ctx.compare(b, c) == Ordering::Less {
                    assert_eq!(ctx.compare(a, c), Ordering::Less);
                }
            }
        }
    }
}

#[test]
fn test_boolean_identities() {
    let ctx = Context::default();
    let a = ctx.symbol("a");
    let b = ctx.symbol("b");
    let t = ctx.boolean(true);
    let f = ctx.boolean(false);
    let na = ctx.not(a).unwrap();

    assert_eq!(ctx.not(na).unwrap(), a);
    assert_eq!(ctx.and([a, na]).unwrap(), f);
    assert_eq!(ctx.or([a, na]).unwrap(), t);
    assert_eq!(ctx.and([a, t]).unwrap(), a);
    assert_eq!(ctx.or([a, f]).unwrap(), a);
    assert_eq!(ctx.and([a, b]).unwrap(), ctx.and([b, a]).unwrap());
    assert_eq!(ctx.xor([a, a]).unwrap(), f);
    assert_eq!(ctx.implies(a, b).unwrap(), ctx.or([na, b]).unwrap());
    let x = ctx.xor([a, b]).unwrap();
    assert_eq!(ctx.equiv(a, b).unwrap(), ctx.not(x).unwrap());
}

#[test]
fn test_assumptions() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let is_int = ctx.is_integer(x).unwrap();
    let is_real = ctx.is_real(x).unwrap();
    assert_eq!(ctx.test(is_real, is_int).unwrap(), Truth::True);
    let not_real = ctx.not(is_real).unwrap();
    assert_eq!(ctx.test(is_int, not_real).unwrap(), Truth::False);
}

fn check_minimize(ctx: &Context, f: ExprRef) {
    let table = ctx.truth_table(f, None).unwrap();
    let m = ctx.minimize(f).unwrap();
    assert_eq!(ctx.truth_table(m, Some(&table.atoms)).unwrap(), table);
}

#[test]
fn test_minimize_is_sound() {
    let ctx = Context::default();
    let a = ctx.symbol("a");
    let b = ctx.symbol("b");
    let c = ctx.symbol("c");
    let d = ctx.symbol("d");
    let nb = ctx.not(b).unwrap();
    let nd = ctx.not(d).unwrap();

    let f1 = ctx.or([ctx.and([a, b]).unwrap(), ctx.and([a, nb]).unwrap()]).unwrap();
    assert_eq!(ctx.minimize(f1).unwrap(), a);

    let f2 = ctx.xor([a, b, c, d]).unwrap();
    check_minimize(&ctx, f2);

    let f3 = ctx
        .or([
            ctx.and([a, nb, c]).unwrap(),
            ctx.and([b, nd]).unwrap(),
            ctx.implies(c, d).unwrap(),
        ])
        .unwrap();
    check_minimize(&ctx, f3);

    let f4 = ctx.equiv(ctx.and([a, b]).unwrap(), ctx.or([c, d]).unwrap()).unwrap();
    check_minimize(&ctx, f4);
}

#[test]
fn test_cache_discipline() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let s = ctx.add(x, y);
    assert_eq!(ctx.add(x, y), s);
    ctx.clear_cache();
    ctx.clear_cache();
    assert_eq!(ctx.cached(), 0);
    assert_eq!(ctx.add(x, y), s);
    assert!(ctx.cached() > 0);
}

#[test]
fn test_subs() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    let y = ctx.symbol("y");
    let z = ctx.symbol("z");
    let s = ctx.add(x, y);
    assert_eq!(ctx.subs(s, z, x).unwrap(), s);
    assert_eq!(ctx.subs(s, x, y).unwrap(), ctx.mul(ctx.integer(2), y));
}

#[test]
fn test_sympify() {
    let ctx = Context::default();
    let x = ctx.symbol("x");
    assert_eq!(ctx.sympify("x").unwrap(), x);
    assert_eq!(ctx.sympify(7i64).unwrap(), ctx.integer(7));
    assert_eq!(ctx.sympify("2/4").unwrap(), ctx.rational(1, 2).unwrap());
    assert!(ctx.sympify("x +* y").is_err());
}
