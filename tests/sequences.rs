//! Sequences of edits over heterogeneous operands: entities, whole
//! groups, and arrays of entities, interleaved in one history.

use rewind::{Entity, EntityId, Group, History};
use serde_json::{json, Value};

fn model(id: &str, foo: &str, bar: &str) -> Entity {
    Entity::from_serialize(id, &json!({ "foo": foo, "bar": bar })).unwrap()
}

fn collection() -> Group {
    Group::new(vec![
        model("id0", "a", "b"),
        model("id1", "c", "d"),
        model("id2", "e", "f"),
    ])
    .unwrap()
}

fn foo(entity: &Entity) -> Value {
    entity.get("foo").unwrap()
}

fn id(s: &str) -> EntityId {
    EntityId::from(s)
}

#[test]
fn test_editing_an_entity_and_then_a_group() {
    let mut manager = History::new();
    let collection = collection();
    let model0 = collection.at(0).unwrap();

    manager.begin(&model0);
    model0.set("foo", 1);
    manager.end();

    manager.begin(&collection);
    collection.remove(model0.id());
    manager.end();

    assert_eq!(collection.len(), 2);

    manager.undo();
    assert_eq!(collection.len(), 3);
    assert_eq!(foo(&collection.get(&id("id0")).unwrap()), json!(1));

    manager.undo();
    assert_eq!(foo(&collection.get(&id("id0")).unwrap()), json!("a"));

    manager.redo();
    assert_eq!(foo(&collection.get(&id("id0")).unwrap()), json!(1));

    manager.redo();
    assert!(collection.get(&id("id0")).is_none());
}

#[test]
fn test_editing_a_group_and_then_an_entity() {
    let mut manager = History::new();
    let collection = collection();
    let id0 = collection.at(0).unwrap().id().clone();
    let id1 = collection.at(1).unwrap().id().clone();

    // Add an entity.
    manager.begin(&collection);
    collection
        .add(Entity::from_serialize(EntityId::auto(), &json!({ "foo": "g", "bar": "h" })).unwrap())
        .unwrap();
    manager.end();

    // Remove an entity.
    manager.begin(&collection);
    collection.remove(&id0);
    manager.end();

    // Change an entity.
    assert_eq!(collection.at(0).unwrap().id(), &id1);
    let first = collection.at(0).unwrap();
    manager.begin(&first);
    first.set("foo", "x");
    manager.end();

    manager.undo();
    assert_eq!(collection.len(), 3);
    assert_eq!(foo(&collection.get(&id1).unwrap()), json!("c"));
    assert!(collection.get(&id0).is_none());

    manager.undo();
    assert_eq!(collection.len(), 4);
    assert_eq!(foo(&collection.get(&id0).unwrap()), json!("a"));

    manager.undo();
    assert_eq!(collection.len(), 3);

    manager.redo();
    assert_eq!(collection.len(), 4);
    assert_eq!(foo(&collection.get(&id0).unwrap()), json!("a"));

    manager.redo();
    assert_eq!(collection.len(), 3);
    assert!(collection.get(&id0).is_none());
    assert_eq!(foo(&collection.get(&id1).unwrap()), json!("c"));

    manager.redo();
    assert_eq!(foo(&collection.get(&id1).unwrap()), json!("x"));
}

#[test]
fn test_editing_an_entity_and_then_an_array_of_entities() {
    let mut manager = History::new();
    let collection = collection();
    let model0 = collection.at(0).unwrap();
    let model1 = collection.at(1).unwrap();
    let model2 = collection.at(2).unwrap();

    // Edit the first entity.
    manager.begin(&model0);
    model0.set("foo", 1);
    manager.end();

    // The current step has one snapshot.
    assert_eq!(manager.current().unwrap().len(), 1);
    assert_eq!(foo(&model0), json!(1));

    manager.undo();
    assert_eq!(foo(&model0), json!("a"));

    manager.redo();
    assert_eq!(foo(&model0), json!(1));

    // Now edit the second and third entities as a batch.
    let array = vec![model1.clone(), model2.clone()];

    manager.begin(array);
    model1.set("foo", 2);
    model2.set("foo", 3);
    manager.end();

    assert_eq!(foo(&model0), json!(1));
    assert_eq!(foo(&model1), json!(2));
    assert_eq!(foo(&model2), json!(3));

    manager.undo();
    assert_eq!(foo(&model0), json!(1));
    assert_eq!(foo(&model1), json!("c"));
    assert_eq!(foo(&model2), json!("e"));

    manager.undo();
    assert_eq!(foo(&model0), json!("a"));
    assert_eq!(foo(&model1), json!("c"));
    assert_eq!(foo(&model2), json!("e"));

    manager.redo();
    assert_eq!(foo(&model0), json!(1));
    assert_eq!(foo(&model1), json!("c"));
    assert_eq!(foo(&model2), json!("e"));

    manager.redo();
    assert_eq!(foo(&model0), json!(1));
    assert_eq!(foo(&model1), json!(2));
    assert_eq!(foo(&model2), json!(3));
}

#[test]
fn test_editing_an_array_of_entities_and_then_each_entity() {
    let mut manager = History::new();
    let collection = collection();
    let model0 = collection.at(0).unwrap();
    let model1 = collection.at(1).unwrap();

    let array = vec![model0.clone(), model1.clone()];

    manager.begin(array);
    model0.set("foo", 1);
    model1.set("foo", 2);
    manager.end();

    manager.begin(&model0);
    model0.set("foo", 3);
    manager.end();

    manager.begin(&model1);
    model1.set("foo", 4);
    manager.end();

    assert_eq!(foo(&model0), json!(3));
    assert_eq!(foo(&model1), json!(4));

    manager.undo();
    assert_eq!(foo(&model0), json!(3));
    assert_eq!(foo(&model1), json!(2));

    manager.undo();
    assert_eq!(foo(&model0), json!(1));
    assert_eq!(foo(&model1), json!(2));

    manager.undo();
    assert_eq!(foo(&model0), json!("a"));
    assert_eq!(foo(&model1), json!("c"));

    manager.redo();
    assert_eq!(foo(&model0), json!(1));
    assert_eq!(foo(&model1), json!(2));

    manager.redo();
    assert_eq!(foo(&model0), json!(3));
    assert_eq!(foo(&model1), json!(2));

    manager.redo();
    assert_eq!(foo(&model0), json!(3));
    assert_eq!(foo(&model1), json!(4));
}
