use std::collections::HashMap;

use lyra_types::{resolve_type, DeclKind, Type, TypeEnv, TypeStore};
use lyra_types_bridge::{load_declarations, DeclLoader, DeclProvider, DeclStub, TypeRef};

use pretty_assertions::assert_eq;

struct MapProvider {
    stubs: HashMap<String, DeclStub>,
}

impl MapProvider {
    fn new(stubs: Vec<DeclStub>) -> Self {
        Self {
            stubs: stubs
                .into_iter()
                .map(|stub| (stub.name.clone(), stub))
                .collect(),
        }
    }
}

impl DeclProvider for MapProvider {
    fn lookup_decl(&self, binary_name: &str) -> Option<DeclStub> {
        self.stubs.get(binary_name).cloned()
    }
}

#[test]
fn loader_materializes_transitive_references() {
    let provider = MapProvider::new(vec![
        DeclStub {
            name: "com.example.Repository".to_string(),
            kind: DeclKind::Interface,
            type_params: vec!["T".to_string()],
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        },
        DeclStub {
            name: "com.example.User".to_string(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            super_class: Some(TypeRef::Named("java.lang.Object".to_string())),
            interfaces: Vec::new(),
            enclosing: None,
        },
        DeclStub {
            name: "com.example.UserRepository".to_string(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            super_class: Some(TypeRef::Named("java.lang.Object".to_string())),
            interfaces: vec![TypeRef::Generic {
                name: "com.example.Repository".to_string(),
                args: vec![TypeRef::Named("com.example.User".to_string())],
            }],
            enclosing: None,
        },
    ]);

    let mut store = TypeStore::new();
    let mut loader = DeclLoader::new(&mut store, &provider);

    let user_repository = loader.ensure_decl("com.example.UserRepository").unwrap();
    let repository = store.lookup_decl("com.example.Repository").unwrap();
    let user = store.lookup_decl("com.example.User").unwrap();

    // The loaded hierarchy is immediately resolvable by the core.
    let t = Type::variable(repository, 0, "T");
    let resolved = resolve_type(&store, &Type::raw(user_repository), &t).unwrap();
    assert_eq!(resolved.into_owned(), Type::raw(user));
}

#[test]
fn self_referential_stub_resolves_to_its_own_id() {
    let provider = MapProvider::new(vec![
        DeclStub {
            name: "com.example.Ord".to_string(),
            kind: DeclKind::Interface,
            type_params: vec!["T".to_string()],
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        },
        // Node implements Ord<Node>: the interface argument refers back to
        // the declaration being loaded.
        DeclStub {
            name: "com.example.Node".to_string(),
            kind: DeclKind::Class,
            type_params: Vec::new(),
            super_class: Some(TypeRef::Named("java.lang.Object".to_string())),
            interfaces: vec![TypeRef::Generic {
                name: "com.example.Ord".to_string(),
                args: vec![TypeRef::Named("com.example.Node".to_string())],
            }],
            enclosing: None,
        },
    ]);

    let mut store = TypeStore::new();
    let mut loader = DeclLoader::new(&mut store, &provider);

    let node = loader.ensure_decl("com.example.Node").unwrap();
    let ord = store.lookup_decl("com.example.Ord").unwrap();

    let def = store.decl(node).unwrap();
    assert_eq!(
        def.interfaces,
        vec![Type::parameterized(ord, vec![Type::raw(node)])]
    );
}

#[test]
fn variables_and_wildcards_convert_structurally() {
    let provider = MapProvider::new(vec![
        DeclStub {
            name: "com.example.Sink".to_string(),
            kind: DeclKind::Interface,
            type_params: vec!["T".to_string()],
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
        },
        // Funnel<E> implements Sink<E[]>.
        DeclStub {
            name: "com.example.Funnel".to_string(),
            kind: DeclKind::Class,
            type_params: vec!["E".to_string()],
            super_class: Some(TypeRef::Named("java.lang.Object".to_string())),
            interfaces: vec![TypeRef::Generic {
                name: "com.example.Sink".to_string(),
                args: vec![TypeRef::Array(Box::new(TypeRef::Variable("E".to_string())))],
            }],
            enclosing: None,
        },
    ]);

    let mut store = TypeStore::new();
    let mut loader = DeclLoader::new(&mut store, &provider);

    let funnel = loader.ensure_decl("com.example.Funnel").unwrap();
    let sink = store.lookup_decl("com.example.Sink").unwrap();

    let def = store.decl(funnel).unwrap();
    assert_eq!(
        def.interfaces,
        vec![Type::parameterized(
            sink,
            vec![Type::array(Type::variable(funnel, 0, "E"))],
        )]
    );
}

#[test]
fn bulk_load_drops_names_that_fail_to_resolve() {
    let provider = MapProvider::new(vec![DeclStub {
        name: "com.example.User".to_string(),
        kind: DeclKind::Class,
        type_params: Vec::new(),
        super_class: Some(TypeRef::Named("java.lang.Object".to_string())),
        interfaces: Vec::new(),
        enclosing: None,
    }]);

    let mut store = TypeStore::new();
    let loaded = load_declarations(
        &mut store,
        &provider,
        ["com.example.User", "com.example.Missing"],
    );

    let user = store.lookup_decl("com.example.User").unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains(&user));
    assert_eq!(store.lookup_decl("com.example.Missing"), None);
}
