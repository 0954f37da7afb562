use async_trait::async_trait;
use dtoguard::prelude::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn registry() -> TypeRegistry {
    let registry = TypeRegistry::new();

    registry
        .register(
            "customValidator",
            TypeDefinition::new().field(
                "prop",
                FieldMeta::new().validator(validator_fn(|ctx| {
                    Outcome::check(ctx.value == "value", "expected value")
                })),
            ),
        )
        .unwrap();

    registry
        .register(
            "multipleFields",
            TypeDefinition::new()
                .required_props(["name", "age"])
                .field(
                    "name",
                    FieldMeta::new().required().validator(is_string(StringRules::default())),
                )
                .field(
                    "age",
                    FieldMeta::new().validator(is_number(NumberRules::default().int().min(12.0))),
                )
                .field(
                    "email",
                    FieldMeta::new().validator(is_string(
                        StringRules::default()
                            .pattern(r"^[a-z0-9.\-_]+@[a-z.\-_]+\.[a-z]+$")
                            .unwrap()
                            .error_text("wrong email"),
                    )),
                )
                .field("nested", FieldMeta::new().nested("customValidator")),
        )
        .unwrap();

    registry
        .register(
            "withArray",
            TypeDefinition::new()
                .field("a", FieldMeta::new().array(ArrayType::Any))
                .field(
                    "b",
                    FieldMeta::new()
                        .array(ArrayType::Constrained(ArrayOptions::default().max_length(2)))
                        .item_validator(is_number(NumberRules::default())),
                )
                .field(
                    "c",
                    FieldMeta::new().array(ArrayType::Constrained(
                        ArrayOptions::default()
                            .min_length(1)
                            .item_type(fixed_item_type("customValidator")),
                    )),
                ),
        )
        .unwrap();

    registry
}

fn engine() -> Engine {
    Engine::with_provider(Arc::new(registry()))
}

#[tokio::test]
async fn validates_single_property() {
    let engine = engine();

    let outcome = engine
        .validate(&json!({ "_type": "customValidator", "prop": "random" }))
        .await;
    assert_eq!(outcome.to_json(), json!({ "prop": "expected value" }));

    let outcome = engine
        .validate(&json!({ "_type": "customValidator", "prop": "value" }))
        .await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn validates_several_properties() {
    let engine = engine();

    let outcome = engine.validate(&json!({ "_type": "multipleFields", "age": 5 })).await;
    assert_eq!(
        outcome.to_json(),
        json!({
            "age": "\"age\" does not satisfy min = 12",
            "name": "Field \"name\" is required",
        })
    );

    let outcome = engine
        .validate(&json!({
            "_type": "multipleFields",
            "age": 15,
            "name": "John",
            "email": "test.email",
        }))
        .await;
    assert_eq!(outcome.to_json(), json!({ "email": "wrong email" }));

    let outcome = engine
        .validate(&json!({
            "_type": "multipleFields",
            "age": 15,
            "name": "John",
            "email": "john@mail.com",
        }))
        .await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn rejects_unspecified_fields() {
    let outcome = engine()
        .validate(&json!({ "_type": "customValidator", "prop": "value", "newProp": "test" }))
        .await;
    assert_eq!(outcome.to_json(), json!({ "newProp": "Unexpected field \"newProp\"" }));
}

#[tokio::test]
async fn allows_extra_fields_when_configured() {
    let registry = TypeRegistry::new();
    registry
        .register("open", TypeDefinition::new().allow_extra_fields())
        .unwrap();
    let engine = Engine::with_provider(Arc::new(registry));

    let outcome = engine.validate(&json!({ "_type": "open", "anything": [1, 2] })).await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn validates_nested_objects() {
    let engine = engine();
    let base = json!({
        "_type": "multipleFields",
        "age": 15,
        "name": "John",
        "email": "john@mail.com",
    });

    let mut invalid = base.clone();
    invalid["nested"] = json!({ "_type": "customValidator", "prop": "test" });
    let outcome = engine.validate(&invalid).await;
    assert_eq!(outcome.to_json(), json!({ "nested": { "prop": "expected value" } }));

    let mut valid = base;
    valid["nested"] = json!({ "_type": "customValidator", "prop": "value" });
    assert!(engine.validate(&valid).await.is_valid());
}

#[tokio::test]
async fn nested_type_comes_from_field_metadata() {
    // No discriminator on the nested value: the field's type tag resolves it
    let outcome = engine()
        .validate(&json!({
            "_type": "multipleFields",
            "age": 15,
            "name": "John",
            "nested": { "prop": "test" },
        }))
        .await;
    assert_eq!(outcome.to_json(), json!({ "nested": { "prop": "expected value" } }));
}

#[tokio::test]
async fn validates_arrays() {
    let engine = engine();

    let outcome = engine.validate(&json!({ "_type": "withArray", "a": "abc" })).await;
    assert_eq!(outcome.to_json(), json!({ "a": "\"a\" array expected" }));

    let outcome = engine.validate(&json!({ "_type": "withArray", "a": ["abc"] })).await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn validates_arrays_with_item_validators() {
    let engine = engine();

    let outcome = engine.validate(&json!({ "_type": "withArray", "b": ["abc"] })).await;
    assert_eq!(outcome.to_json(), json!({ "b": ["\"b[0]\" number expected"] }));

    let outcome = engine.validate(&json!({ "_type": "withArray", "b": [1, 2, 3] })).await;
    assert_eq!(outcome.to_json(), json!({ "b": "\"b\" does not satisfy max length 2" }));

    let outcome = engine.validate(&json!({ "_type": "withArray", "b": [1, 2] })).await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn validates_arrays_with_nested_objects() {
    let engine = engine();

    let outcome = engine.validate(&json!({ "_type": "withArray", "c": [] })).await;
    assert_eq!(outcome.to_json(), json!({ "c": "\"c\" does not satisfy min length 1" }));

    let outcome = engine
        .validate(&json!({
            "_type": "withArray",
            "c": [{ "_type": "customValidator", "prop": "test" }],
        }))
        .await;
    assert_eq!(outcome.to_json(), json!({ "c": [{ "prop": "expected value" }] }));

    let outcome = engine
        .validate(&json!({
            "_type": "withArray",
            "c": [{ "_type": "customValidator", "prop": "value" }],
        }))
        .await;
    assert!(outcome.is_valid());
}

#[tokio::test]
async fn non_object_values() {
    let engine = engine();
    let tag = TypeTag::new("customValidator");

    assert_eq!(
        engine.validate_as(&json!("text"), &tag).await,
        Outcome::Invalid("Expected object, got \"string\"".to_string())
    );
    assert_eq!(
        engine.validate_as(&json!([1]), &tag).await,
        Outcome::Invalid("Expected object, got \"array\"".to_string())
    );
}

#[tokio::test]
async fn unknown_types_pass_through() {
    let engine = engine();
    assert!(engine.validate(&json!({ "_type": "unknown", "x": 1 })).await.is_valid());
    assert!(engine.validate(&json!(42)).await.is_valid());
}

fn wide_registry(limit: Option<usize>) -> TypeRegistry {
    let mut definition = TypeDefinition::new();
    if let Some(limit) = limit {
        definition = definition.error_limit(limit);
    }
    for key in ["f1", "f2", "f3", "f4", "f5"] {
        definition = definition.field(key, FieldMeta::new().validator(is_number(NumberRules::default())));
    }
    definition = definition.field("child", FieldMeta::new().nested("wide"));

    let registry = TypeRegistry::new();
    registry.register("wide", definition).unwrap();
    registry
}

fn wide_value() -> Value {
    json!({ "_type": "wide", "f1": "x", "f2": "x", "f3": "x", "f4": "x", "f5": "x" })
}

#[tokio::test]
async fn type_error_limit_caps_collected_errors() {
    let engine = Engine::with_provider(Arc::new(wide_registry(Some(2))));

    let outcome = engine.validate(&wide_value()).await;
    assert_eq!(
        outcome.to_json(),
        json!({ "f1": "\"f1\" number expected", "f2": "\"f2\" number expected" })
    );

    // Determinism: same input, same cutoff
    assert_eq!(engine.validate(&wide_value()).await, outcome);
}

#[tokio::test]
async fn engine_error_limit_applies_when_type_has_none() {
    let engine = Engine::new(
        EngineConfig::default().with_error_limit(3),
        Arc::new(wide_registry(None)),
    );

    match engine.validate(&wide_value()).await {
        Outcome::InvalidTree(tree) => assert_eq!(tree.leaf_count(), 3),
        other => panic!("expected error tree, got {:?}", other),
    }
}

#[tokio::test]
async fn default_error_limit_is_ten() {
    let registry = TypeRegistry::new();
    let mut definition = TypeDefinition::new();
    let mut value = serde_json::Map::new();
    value.insert("_type".to_string(), json!("many"));
    for index in 0..15 {
        let key = format!("f{}", index);
        definition = definition.field(key.clone(), FieldMeta::new().validator(is_boolean(None)));
        value.insert(key, json!(index));
    }
    registry.register("many", definition).unwrap();
    let engine = Engine::with_provider(Arc::new(registry));

    match engine.validate(&Value::Object(value)).await {
        Outcome::InvalidTree(tree) => assert_eq!(tree.leaf_count(), 10),
        other => panic!("expected error tree, got {:?}", other),
    }
}

#[tokio::test]
async fn global_limit_stops_enclosing_scopes() {
    // Root limit 3; the nested object alone could collect 5
    let registry = TypeRegistry::new();
    let mut nested = TypeDefinition::new();
    for key in ["n1", "n2", "n3", "n4", "n5"] {
        nested = nested.field(key, FieldMeta::new().validator(is_number(NumberRules::default())));
    }
    registry.register("inner", nested).unwrap();
    registry
        .register(
            "outer",
            TypeDefinition::new()
                .error_limit(3)
                .field("inner", FieldMeta::new().nested("inner"))
                .field("after", FieldMeta::new().validator(is_number(NumberRules::default()))),
        )
        .unwrap();
    let engine = Engine::with_provider(Arc::new(registry));

    let outcome = engine
        .validate(&json!({
            "_type": "outer",
            "inner": { "n1": "x", "n2": "x", "n3": "x", "n4": "x", "n5": "x" },
            "after": "x",
        }))
        .await;

    let Outcome::InvalidTree(tree) = outcome else {
        panic!("expected error tree");
    };
    assert_eq!(tree.leaf_count(), 3);
    assert!(tree.field("after").is_none());
    assert_eq!(tree.field("inner").and_then(ErrorNode::as_tree).map(ErrorTree::len), Some(3));
}

#[tokio::test]
async fn error_object_follows_input_key_order() {
    let engine = Engine::with_provider(Arc::new(wide_registry(None)));

    let outcome = engine
        .validate(&json!({ "_type": "wide", "f2": "x", "f1": "x" }))
        .await;
    assert_eq!(
        serde_json::to_string(&outcome).unwrap(),
        r#"{"f2":"\"f2\" number expected","f1":"\"f1\" number expected"}"#
    );
}

fn listed_registry(limit: usize) -> TypeRegistry {
    let registry = TypeRegistry::new();
    registry
        .register(
            "listed",
            TypeDefinition::new()
                .error_limit(limit)
                .field(
                    "list",
                    FieldMeta::new()
                        .array(ArrayType::Any)
                        .item_validator(is_number(NumberRules::default())),
                )
                .field("f1", FieldMeta::new().validator(is_boolean(None)))
                .field("f2", FieldMeta::new().validator(is_boolean(None)))
                .field("f3", FieldMeta::new().validator(is_boolean(None))),
        )
        .unwrap();
    registry
        .register("holder", TypeDefinition::new().field("inner", FieldMeta::new().nested("listed")))
        .unwrap();
    registry
}

#[tokio::test]
async fn array_errors_do_not_advance_object_budget() {
    // The holder keeps the global limit at 10, so only the local limit of 2 applies
    let engine = Engine::with_provider(Arc::new(listed_registry(2)));

    let outcome = engine
        .validate(&json!({
            "_type": "holder",
            "inner": { "list": ["x"], "f1": 1, "f2": 1, "f3": 1 },
        }))
        .await;
    assert_eq!(
        outcome.to_json(),
        json!({
            "inner": {
                "list": ["\"list[0]\" number expected"],
                "f1": "\"f1\" boolean expected",
                "f2": "\"f2\" boolean expected",
            }
        })
    );
}

#[tokio::test]
async fn global_limit_cuts_array_inside_object() {
    let engine = Engine::new(
        EngineConfig::default().with_error_limit(3),
        Arc::new(listed_registry(3)),
    );

    let outcome = engine
        .validate(&json!({
            "_type": "listed",
            "f1": 1,
            "list": ["a", "b", "c", "d"],
            "f2": 1,
        }))
        .await;
    assert_eq!(
        outcome.to_json(),
        json!({
            "f1": "\"f1\" boolean expected",
            "list": ["\"list[0]\" number expected", "\"list[1]\" number expected"],
        })
    );
}

#[tokio::test]
async fn restore_hook_runs_before_validators_and_items() {
    let calls = AtomicUsize::new(0);
    let hook = || {
        calls.fetch_add(1, Ordering::SeqCst);
    };

    let outcome = engine()
        .validate_with_hook(
            &json!({
                "_type": "withArray",
                "b": [1, 2],
                "c": [{ "_type": "customValidator", "prop": "value" }],
            }),
            None,
            &hook,
        )
        .await;

    assert!(outcome.is_valid());
    // b: 2 items + 2 item validators; c: 1 item + 1 nested "prop" validator
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

struct StaticProvider;

#[async_trait]
impl MetadataProvider for StaticProvider {
    async fn type_meta(&self, _value: &Value, type_tag: Option<&TypeTag>) -> Option<TypeMeta> {
        match type_tag.map(TypeTag::as_str) {
            Some("login") => Some(TypeMeta::dto(DtoOptions::default()).with_required_props(["user"])),
            _ => None,
        }
    }

    async fn field_meta(&self, _value: &Value, _type_tag: Option<&TypeTag>, key: &str) -> Option<FieldMeta> {
        match key {
            "user" => Some(FieldMeta::new().required().label("User name")),
            "password" => Some(FieldMeta::new().validator(validator_fn(|ctx| {
                Outcome::check(ctx.sibling("user") != Some(ctx.value), "password must differ from user")
            }))),
            _ => None,
        }
    }
}

#[tokio::test]
async fn custom_provider_with_explicit_type() {
    let engine = Engine::with_provider(Arc::new(StaticProvider));
    let login = TypeTag::new("login");

    let outcome = engine.validate_as(&json!({ "password": "secret" }), &login).await;
    assert_eq!(outcome.to_json(), json!({ "user": "Field \"User name\" is required" }));

    let outcome = engine
        .validate_as(&json!({ "user": "bob", "password": "bob" }), &login)
        .await;
    assert_eq!(outcome.to_json(), json!({ "password": "password must differ from user" }));

    // Without a tag this provider treats everything as opaque
    assert!(engine.validate(&json!({ "password": "bob" })).await.is_valid());
}
