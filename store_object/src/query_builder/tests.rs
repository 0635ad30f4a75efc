//! Query builder tests

#[cfg(test)]
mod tests {
    use crate::errors::StoreError;
    use crate::query_builder::{
        Dialect, FindOptions, OrderBy, Pagination, PageResult, Predicate, SortOrder, SqlGenerator,
    };
    use crate::traits::{FieldDef, RecordDescriptor, SelectQuery};
    use serde_json::{json, Map, Value};

    static CREW: RecordDescriptor = RecordDescriptor::new(
        "Crew",
        "crew",
        &[
            FieldDef::id("id"),
            FieldDef::text("name"),
            FieldDef::integer("size"),
            FieldDef::boolean("active"),
            FieldDef::timestamp("createdAt"),
        ],
    );

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn pg() -> SqlGenerator {
        SqlGenerator::new(Dialect::Postgres)
    }

    fn sqlite() -> SqlGenerator {
        SqlGenerator::new(Dialect::Sqlite)
    }

    // ========================================
    // SELECT generation
    // ========================================

    #[test]
    fn test_select_all_fields_postgres() {
        let statement = pg().select(&SelectQuery::new(&CREW)).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT json_build_object('id', \"id\", 'name', \"name\", 'size', \"size\", \
             'active', \"active\", 'createdAt', \"createdAt\")::text AS record FROM \"crew\""
        );
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_select_sqlite_projects_booleans_as_json() {
        let mut query = SelectQuery::new(&CREW);
        query.fields = vec!["id".into(), "active".into()];

        let statement = sqlite().select(&query).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT json_object('id', \"id\", 'active', json(CASE \"active\" WHEN 0 THEN 'false' \
             WHEN 1 THEN 'true' END)) AS record FROM \"crew\""
        );
    }

    #[test]
    fn test_select_with_filter_order_and_window() {
        let mut query = SelectQuery::new(&CREW);
        query.fields = vec!["name".into()];
        query.predicate = Predicate::eq("name", "Alpha").and("size", 5);
        query.order_by = Some(OrderBy::desc("createdAt"));
        query.limit = Some(10);
        query.offset = Some(20);

        let statement = pg().select(&query).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT json_build_object('name', \"name\")::text AS record FROM \"crew\" \
             WHERE \"name\" = $1 AND \"size\" = $2 ORDER BY \"createdAt\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(statement.params, vec![json!("Alpha"), json!(5)]);
    }

    #[test]
    fn test_select_rejects_undeclared_fields() {
        let mut query = SelectQuery::new(&CREW);
        query.fields = vec!["password".into()];

        let error = pg().select(&query).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn test_offset_without_limit() {
        let mut query = SelectQuery::new(&CREW);
        query.fields = vec!["id".into()];
        query.offset = Some(5);

        assert!(pg().select(&query).unwrap().sql.ends_with(" OFFSET 5"));
        assert!(sqlite()
            .select(&query)
            .unwrap()
            .sql
            .ends_with(" LIMIT -1 OFFSET 5"));
    }

    #[test]
    fn test_raw_order_is_verbatim() {
        let mut query = SelectQuery::new(&CREW);
        query.fields = vec!["id".into()];
        query.order_by = Some(OrderBy::raw("\"size\" DESC, \"id\" ASC"));

        let statement = pg().select(&query).unwrap();
        assert!(statement.sql.ends_with("ORDER BY \"size\" DESC, \"id\" ASC"));
    }

    #[test]
    fn test_order_parse() {
        assert_eq!(OrderBy::parse("-name"), OrderBy::Column("name".into(), SortOrder::Desc));
        assert_eq!(OrderBy::parse("name"), OrderBy::Column("name".into(), SortOrder::Asc));
    }

    // ========================================
    // WHERE generation
    // ========================================

    #[test]
    fn test_empty_equality_means_no_where() {
        let statement = pg().count(&CREW, &Predicate::default()).unwrap();
        assert_eq!(statement.sql, "SELECT COUNT(*) AS total FROM \"crew\"");
    }

    #[test]
    fn test_null_equality_is_null_check() {
        let predicate = Predicate::eq("name", Value::Null).and("size", 3);
        let statement = pg().count(&CREW, &predicate).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT COUNT(*) AS total FROM \"crew\" WHERE \"name\" IS NULL AND \"size\" = $1"
        );
        assert_eq!(statement.params, vec![json!(3)]);
    }

    #[test]
    fn test_timestamp_equality_is_cast_on_postgres_only() {
        let predicate = Predicate::eq("createdAt", "2024-01-01T00:00:00Z");
        assert!(pg()
            .count(&CREW, &predicate)
            .unwrap()
            .sql
            .ends_with("\"createdAt\" = $1::timestamptz"));
        assert!(sqlite()
            .count(&CREW, &predicate)
            .unwrap()
            .sql
            .ends_with("\"createdAt\" = $1"));
    }

    #[test]
    fn test_equality_field_names_are_validated() {
        let predicate = Predicate::eq("name = name OR 1", 1);
        let error = pg().count(&CREW, &predicate).unwrap_err();
        assert!(matches!(error, StoreError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_always_true_predicate() {
        let statement = pg().count(&CREW, &Predicate::all()).unwrap();
        assert_eq!(statement.sql, "SELECT COUNT(*) AS total FROM \"crew\" WHERE 1 = 1");
    }

    #[test]
    fn test_raw_positional_parameters() {
        let predicate = Predicate::raw("\"name\" = ? AND \"size\" > ?", vec![json!("A"), json!(2)]);
        let statement = pg().count(&CREW, &predicate).unwrap();
        assert!(statement.sql.ends_with("WHERE \"name\" = $1 AND \"size\" > $2"));
        assert_eq!(statement.params, vec![json!("A"), json!(2)]);
    }

    #[test]
    fn test_raw_named_parameters_reuse_placeholders() {
        let params = object(json!({"low": 1, "name": "A"}));
        let predicate = Predicate::raw_named(
            "(\"size\" > :low OR \"id\" > :low) AND \"name\" = :name",
            params,
        );
        let statement = pg().count(&CREW, &predicate).unwrap();
        assert!(statement
            .sql
            .ends_with("WHERE (\"size\" > $1 OR \"id\" > $1) AND \"name\" = $2"));
        assert_eq!(statement.params, vec![json!(1), json!("A")]);
    }

    #[test]
    fn test_raw_escapes_casts_and_literals() {
        let predicate = Predicate::raw(
            "\"name\"::text = ? AND \"name\" <> 'what? :not_a_param' AND \"name\" <> \\?",
            vec![json!("A")],
        );
        let statement = pg().count(&CREW, &predicate).unwrap();
        assert!(statement.sql.ends_with(
            "WHERE \"name\"::text = $1 AND \"name\" <> 'what? :not_a_param' AND \"name\" <> ?"
        ));
        assert_eq!(statement.params.len(), 1);
    }

    #[test]
    fn test_raw_parameter_mismatch() {
        let too_few = Predicate::raw("\"name\" = ? AND \"size\" = ?", vec![json!("A")]);
        assert!(matches!(
            pg().count(&CREW, &too_few),
            Err(StoreError::InvalidPredicate(_))
        ));

        let too_many = Predicate::raw("\"name\" = ?", vec![json!("A"), json!(1)]);
        assert!(matches!(
            pg().count(&CREW, &too_many),
            Err(StoreError::InvalidPredicate(_))
        ));

        let missing_name = Predicate::raw_named("\"name\" = :name", Map::new());
        assert!(matches!(
            pg().count(&CREW, &missing_name),
            Err(StoreError::InvalidPredicate(_))
        ));

        let mixed = Predicate::raw("\"name\" = :name", vec![]);
        assert!(matches!(
            pg().count(&CREW, &mixed),
            Err(StoreError::InvalidPredicate(_))
        ));
    }

    #[test]
    fn test_and_on_raw_predicate() {
        let predicate = Predicate::raw("\"size\" > ?", vec![json!(1)]).and("name", "A");
        let statement = pg().count(&CREW, &predicate).unwrap();
        assert!(statement.sql.ends_with("WHERE (\"size\" > $1) AND \"name\" = $2"));
    }

    // ========================================
    // Write statements
    // ========================================

    #[test]
    fn test_insert_returns_id() {
        let values = object(json!({"name": "Alpha", "size": 5, "createdAt": "2024-01-01T00:00:00Z"}));
        let statement = pg().insert(&CREW, &values).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO \"crew\" (\"name\", \"size\", \"createdAt\") \
             VALUES ($1, $2, $3::timestamptz) RETURNING \"id\""
        );
        assert_eq!(statement.params.len(), 3);
    }

    #[test]
    fn test_insert_without_values() {
        let statement = sqlite().insert(&CREW, &Map::new()).unwrap();
        assert_eq!(statement.sql, "INSERT INTO \"crew\" DEFAULT VALUES RETURNING \"id\"");
    }

    #[test]
    fn test_update_numbers_where_after_set() {
        let values = object(json!({"name": "Beta", "size": 8}));
        let statement = pg().update(&CREW, &Predicate::by_id(4), &values).unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE \"crew\" SET \"name\" = $1, \"size\" = $2 WHERE \"id\" = $3"
        );
        assert_eq!(statement.params, vec![json!("Beta"), json!(8), json!(4)]);
    }

    #[test]
    fn test_update_requires_values() {
        let error = pg().update(&CREW, &Predicate::by_id(1), &Map::new()).unwrap_err();
        assert!(error.is_validation());
    }

    #[test]
    fn test_delete_by_id() {
        let statement = sqlite().delete(&CREW, &Predicate::by_id(2)).unwrap();
        assert_eq!(statement.sql, "DELETE FROM \"crew\" WHERE \"id\" = $1");
        assert_eq!(statement.params, vec![json!(2)]);
    }

    #[test]
    fn test_create_table_per_dialect() {
        assert_eq!(
            pg().create_table(&CREW).unwrap(),
            "CREATE TABLE IF NOT EXISTS \"crew\" (\"id\" BIGSERIAL PRIMARY KEY, \"name\" TEXT, \
             \"size\" BIGINT, \"active\" BOOLEAN, \"createdAt\" TIMESTAMPTZ)"
        );
        assert_eq!(
            sqlite().create_table(&CREW).unwrap(),
            "CREATE TABLE IF NOT EXISTS \"crew\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"name\" TEXT, \"size\" INTEGER, \"active\" BOOLEAN, \"createdAt\" TEXT)"
        );
    }

    // ========================================
    // Pagination
    // ========================================

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::from_options(&FindOptions::new()).unwrap();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, 10);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_limits() {
        let error = Pagination::new(1, 51).unwrap_err();
        assert_eq!(error.to_string(), "Max results per page: 50");
        assert!(Pagination::new(1, 50).is_ok());
        assert!(Pagination::new(0, 10).unwrap_err().is_validation());
        assert!(Pagination::new(1, 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_pagination_offset_check() {
        let first = Pagination::new(1, 10).unwrap();
        assert!(first.check_against(0).is_ok());
        assert!(first.check_against(5).is_ok());

        let second = Pagination::new(2, 10).unwrap();
        assert_eq!(second.offset(), 10);
        assert!(second.check_against(10).is_ok());
        assert_eq!(second.check_against(5).unwrap_err().to_string(), "Invalid page");
    }

    #[test]
    fn test_unaddressable_page_is_invalid() {
        let error = Pagination::new(i64::MAX, 50).unwrap_err();
        assert!(error.is_validation());
        assert_eq!(error.to_string(), "Invalid page");

        let last = Pagination::new(i64::MAX / 50 + 1, 50).unwrap();
        assert_eq!(last.limit(), 50);
        assert!(last.check_against(1000).is_err());
    }

    #[test]
    fn test_total_pages_uses_total_records() {
        let pagination = Pagination::new(3, 10).unwrap();
        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(21), 3);

        let page = PageResult::new(vec![1], pagination, 21);
        assert_eq!(page.records_on_page, 1);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_result_serializes_camel_case() {
        let page = PageResult::new(vec!["a", "b"], Pagination::new(1, 10).unwrap(), 2);
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({
                "results": ["a", "b"],
                "page": 1,
                "perPage": 10,
                "recordsOnPage": 2,
                "totalPages": 1,
                "totalRecords": 2
            })
        );
    }
}
