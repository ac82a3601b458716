use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use query_values::{Encode, Error, Field, Kind, ValueKind, Values};

/// A record with a single field `V` carrying `tag`.
struct One<T> {
    tag: &'static str,
    v: T,
}

impl<T: Encode> Encode for One<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::new("V", &self.v).tag(self.tag)])
    }
}

fn field<T>(v: T) -> One<T> {
    One { tag: "", v }
}

fn tagged<T>(tag: &'static str, v: T) -> One<T> {
    One { tag, v }
}

/// Checks that encoding `input` yields exactly `want`.
#[track_caller]
fn check<T: Encode + ?Sized>(input: &T, want: &[(&str, &str)]) {
    let got = query_values::to_values(input).expect("encode");
    let want: Values = want.iter().copied().collect();
    assert_eq!(got, want);
}

#[test]
fn zero_values() {
    check(&field(String::new()), &[("V", "")]);
    check(&field(0i32), &[("V", "0")]);
    check(&field(0u32), &[("V", "0")]);
    check(&field(0f32), &[("V", "0")]);
    check(&field(false), &[("V", "false")]);
}

#[test]
fn simple_non_zero_values() {
    check(&field("v"), &[("V", "v")]);
    check(&field(1i64), &[("V", "1")]);
    check(&field(1usize), &[("V", "1")]);
    check(&field(0.1f32), &[("V", "0.1")]);
    check(&field(-2.5f64), &[("V", "-2.5")]);
    check(&field(true), &[("V", "true")]);
    check(&field('c'), &[("V", "c")]);
}

#[test]
fn empty_tag_keeps_field_name() {
    check(&tagged("", false), &[("V", "false")]);
    check(&tagged("", true), &[("V", "true")]);
}

#[test]
fn time_values_use_default_layout() {
    let time = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(12, 34, 56)
        .unwrap();
    check(&field(time), &[("V", "2000-01-01 12:34:56")]);
}

#[test]
fn null_pointers_are_omitted() {
    check(&field(None::<String>), &[]);
    check(&field(None::<i32>), &[]);
    check(&field(None::<Box<One<i32>>>), &[]);
}

#[test]
fn non_null_pointers_are_followed() {
    check(&field(Some("s".to_owned())), &[("V", "s")]);
    check(&field(Some(Some("s"))), &[("V", "s")]);
    check(&field(Box::new(3u8)), &[("V", "3")]);
    check(&field(std::rc::Rc::new("rc")), &[("V", "rc")]);
    check(&field(std::sync::Arc::new("arc")), &[("V", "arc")]);
}

#[test]
fn sequences_of_pointers() {
    check(&field(Vec::<Option<&str>>::new()), &[]);
    check(
        &field(vec![Some("s"), None, Some("s")]),
        &[("V[0]", "s"), ("V[2]", "s")],
    );
}

#[test]
fn pointers_to_sequences() {
    check(&field(None::<Vec<String>>), &[]);
    check(&field(Some(vec!["a", "b"])), &[("V[0]", "a"), ("V[1]", "b")]);
}

#[test]
fn root_pointers() {
    check(&None::<One<String>>, &[]);
    check(&Some(field(String::new())), &[("V", "")]);
    check(&Some(field("v")), &[("V", "v")]);
    check(&Box::new(field("v")), &[("V", "v")]);
}

#[test]
fn sequences() {
    check(&field(Vec::<String>::new()), &[]);
    check(&field(vec![""]), &[("V[0]", "")]);
    check(&field(vec!["a", "b"]), &[("V[0]", "a"), ("V[1]", "b")]);
    check(&field(["", ""]), &[("V[0]", ""), ("V[1]", "")]);
    check(&field(["a", "b"]), &[("V[0]", "a"), ("V[1]", "b")]);
    check(
        &field(std::collections::VecDeque::from([1, 2])),
        &[("V[0]", "1"), ("V[1]", "2")],
    );
}

#[test]
fn sequence_at_the_root() {
    check(&vec!["a", "b"], &[("[0]", "a"), ("[1]", "b")]);
    check(&Vec::<String>::new(), &[]);
}

#[derive(Default)]
struct SubNested {
    value: String,
}

impl Encode for SubNested {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::new("Value", &self.value).tag("value")])
    }
}

#[derive(Default)]
struct Nested {
    a: SubNested,
    b: Option<SubNested>,
    ptr: Option<SubNested>,
}

impl Encode for Nested {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![
            Field::new("A", &self.a).tag("a"),
            Field::new("B", &self.b).tag("b"),
            Field::new("Ptr", &self.ptr).tag("ptr,omitempty"),
        ])
    }
}

struct Nest {
    nest: Nested,
}

impl Encode for Nest {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::new("Nest", &self.nest).tag("nest")])
    }
}

#[test]
fn nested_records() {
    check(
        &Nest {
            nest: Nested {
                a: SubNested {
                    value: "v".to_owned(),
                },
                ..Default::default()
            },
        },
        &[("nest[a][value]", "v")],
    );
    check(
        &Nest {
            nest: Nested {
                ptr: Some(SubNested {
                    value: "v".to_owned(),
                }),
                ..Default::default()
            },
        },
        &[("nest[a][value]", ""), ("nest[ptr][value]", "v")],
    );
    check(&None::<Nest>, &[]);
}

struct Private {
    v: String,
}

impl Encode for Private {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::new("v", &self.v).hidden()])
    }
}

#[test]
fn omit_empty() {
    check(&Private { v: String::new() }, &[]);
    check(&tagged(",omitempty", String::new()), &[]);
    check(&tagged("-", String::new()), &[]);
    check(&tagged("-", "set".to_owned()), &[]);
    check(&tagged("-,omitempty", "set"), &[]);
    // actually named omitempty
    check(&tagged("omitempty", String::new()), &[("omitempty", "")]);
    // unknown options are ignored
    check(&tagged("v,unknown", 0), &[("v", "0")]);
}

#[test]
fn omit_empty_keeps_pointer_to_empty_value() {
    check(&tagged(",omitempty", Some(String::new())), &[("V", "")]);
    check(&tagged(",omitempty", None::<String>), &[]);
    check(&tagged("v,omitempty", Some(0)), &[("v", "0")]);
}

#[test]
fn omit_empty_on_collections() {
    check(&tagged("v,omitempty", Vec::<i32>::new()), &[]);
    check(&tagged("v,omitempty", BTreeMap::<String, i32>::new()), &[]);
    check(&tagged("v,omitempty", vec![0]), &[("v[0]", "0")]);
}

#[derive(Default)]
struct Inner {
    v: String,
}

impl Encode for Inner {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::new("V", &self.v)])
    }
}

struct Outer {
    inner: Inner,
}

impl Encode for Outer {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::embedded("Inner", &self.inner)])
    }
}

struct OuterPtr {
    inner: Option<Box<Inner>>,
}

impl Encode for OuterPtr {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::embedded("Inner", &self.inner)])
    }
}

struct Mixed {
    inner: Inner,
    v: String,
}

impl Encode for Mixed {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![
            Field::embedded("Inner", &self.inner),
            Field::new("V", &self.v),
        ])
    }
}

struct Unexported {
    inner: Inner,
    v: String,
}

impl Encode for Unexported {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![
            Field::embedded("Inner", &self.inner),
            Field::new("V", &self.v),
        ])
    }
}

struct Exported {
    unexported: Unexported,
}

impl Encode for Exported {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::embedded("unexported", &self.unexported).hidden()])
    }
}

fn inner(v: &str) -> Inner {
    Inner { v: v.to_owned() }
}

#[test]
fn embedded_records_are_flattened() {
    check(&Outer { inner: inner("a") }, &[("V", "a")]);
    check(
        &OuterPtr {
            inner: Some(Box::new(inner("a"))),
        },
        &[("V", "a")],
    );
    check(
        &Mixed {
            inner: inner("a"),
            v: "b".to_owned(),
        },
        &[("V", "a"), ("V", "b")],
    );
}

#[test]
fn embedded_hidden_record_still_contributes_fields() {
    check(
        &Exported {
            unexported: Unexported {
                inner: inner("bar"),
                v: "foo".to_owned(),
            },
        },
        &[("V", "bar"), ("V", "foo")],
    );
}

#[test]
fn embedded_null_pointer_is_omitted() {
    check(&OuterPtr { inner: None }, &[]);
}

struct EmbeddedTagged {
    inner: Inner,
}

impl Encode for EmbeddedTagged {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![
            Field::embedded("Inner", &self.inner).tag("inner,omitempty"),
        ])
    }
}

#[test]
fn embedding_ignores_name_and_omitempty() {
    check(
        &EmbeddedTagged {
            inner: Inner::default(),
        },
        &[("V", "")],
    );
}

struct EmbeddedScalar {
    count: u32,
}

impl Encode for EmbeddedScalar {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![Field::embedded("count", &self.count).hidden()])
    }
}

#[test]
fn embedded_non_record_is_a_regular_field() {
    check(&EmbeddedScalar { count: 3 }, &[("count", "3")]);
}

#[test]
fn invalid_root_kinds() {
    assert_eq!(
        query_values::to_values(&"").unwrap_err(),
        Error::UnsupportedRootKind(ValueKind::String)
    );
    assert_eq!(
        query_values::to_values(&5).unwrap_err(),
        Error::UnsupportedRootKind(ValueKind::Int)
    );
    assert_eq!(
        query_values::to_values(&Some(true)).unwrap_err(),
        Error::UnsupportedRootKind(ValueKind::Bool)
    );
    // only one level of indirection is removed at the root
    assert_eq!(
        query_values::to_values(&Some(Some(vec![1]))).unwrap_err(),
        Error::UnsupportedRootKind(ValueKind::Reference)
    );
}

#[test]
fn nested_maps() {
    let mut sex: BTreeMap<&str, Box<dyn Encode>> = BTreeMap::new();
    sex.insert("s3", Box::new(3));
    sex.insert("s5", Box::new("ssss"));

    let mut age: BTreeMap<&str, Box<dyn Encode>> = BTreeMap::new();
    age.insert("a1", Box::new(1));
    age.insert("a2", Box::new("2"));
    age.insert("sex", Box::new(sex));

    let mut root: BTreeMap<&str, Box<dyn Encode>> = BTreeMap::new();
    root.insert("name", Box::new("murong"));
    root.insert("age", Box::new(age));

    check(
        &root,
        &[
            ("name", "murong"),
            ("age[a1]", "1"),
            ("age[a2]", "2"),
            ("age[sex][s3]", "3"),
            ("age[sex][s5]", "ssss"),
        ],
    );
}

#[test]
fn hash_maps() {
    let mut map = HashMap::new();
    map.insert("a".to_owned(), Some(1));
    map.insert("b".to_owned(), None);
    map.insert("c".to_owned(), Some(3));
    check(&map, &[("a", "1"), ("c", "3")]);

    check(&HashMap::<String, i32>::new(), &[]);
}

#[test]
fn map_keys_must_be_strings() {
    let ints = BTreeMap::from([(1, "a")]);
    assert_eq!(
        query_values::to_values(&ints).unwrap_err(),
        Error::InvalidMapKeyKind(ValueKind::Int)
    );

    let bools = BTreeMap::from([(true, "a")]);
    assert_eq!(
        query_values::to_values(&field(bools)).unwrap_err(),
        Error::InvalidMapKeyKind(ValueKind::Bool)
    );

    let chars = BTreeMap::from([('k', "a")]);
    assert_eq!(
        query_values::to_values(&chars).unwrap_err(),
        Error::InvalidMapKeyKind(ValueKind::Char)
    );
}

#[test]
fn empty_map_with_non_string_keys_is_fine() {
    check(&BTreeMap::<u8, u8>::new(), &[]);
}

/// A record that nests itself through `child`.
struct Chain {
    name: String,
    child: Option<Box<Chain>>,
}

impl Encode for Chain {
    fn kind(&self) -> Kind<'_> {
        Kind::Record(vec![
            Field::new("Name", &self.name).tag("name,omitempty"),
            Field::new("Child", &self.child).tag("child,omitempty"),
        ])
    }
}

/// Builds `depth` nested records, the innermost one named `leaf`.
fn chain(depth: usize, leaf: &str) -> Chain {
    let mut node = Chain {
        name: leaf.to_owned(),
        child: None,
    };
    for _ in 1..depth {
        node = Chain {
            name: String::new(),
            child: Some(Box::new(node)),
        };
    }
    node
}

#[test]
fn seven_nested_records_succeed() {
    check(&chain(7, ""), &[]);
}

#[test]
fn eight_nested_records_fail() {
    assert_eq!(
        query_values::to_values(&chain(8, "")).unwrap_err(),
        Error::MaxDepthExceeded(7)
    );
}

#[test]
fn leaf_at_the_deepest_level() {
    check(
        &chain(6, "x"),
        &[("child[child][child][child][child][name]", "x")],
    );
    assert_eq!(
        query_values::to_values(&chain(7, "x")).unwrap_err(),
        Error::MaxDepthExceeded(7)
    );
}

#[test]
fn errors_never_return_partial_values() {
    struct Partial {
        ok: String,
        bad: BTreeMap<i32, i32>,
    }

    impl Encode for Partial {
        fn kind(&self) -> Kind<'_> {
            Kind::Record(vec![
                Field::new("ok", &self.ok),
                Field::new("bad", &self.bad),
            ])
        }
    }

    let result = query_values::to_values(&Partial {
        ok: "written first".to_owned(),
        bad: BTreeMap::from([(1, 1)]),
    });
    assert_eq!(result, Err(Error::InvalidMapKeyKind(ValueKind::Int)));
}

#[test]
fn wire_string() {
    let s = query_values::to_string(&Nest {
        nest: Nested {
            a: SubNested {
                value: "a b&c".to_owned(),
            },
            ..Default::default()
        },
    })
    .unwrap();
    insta::assert_snapshot!(s, @"nest[a][value]=a+b%26c");
}

#[cfg(feature = "indexmap")]
#[test]
fn index_maps() {
    let mut map = indexmap::IndexMap::new();
    map.insert("b", "2");
    map.insert("a", "1");
    check(&map, &[("a", "1"), ("b", "2")]);
}
