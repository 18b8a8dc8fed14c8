use feature_sheet::models::*;
use feature_sheet::sheet::{Level, Session, Sheet, SheetError};
use speculate2::speculate;

fn sheet_with_costs(costs: &[f64]) -> Sheet {
    let actors = costs
        .iter()
        .enumerate()
        .map(|(i, c)| Actor::new(format!("actor {}", i), Role::Dev, Cost::new(*c)))
        .collect();
    let mut category = Category::new("C1");
    category.rows.push(Row::new("Feature", "").with_actors(actors));
    Sheet::from_categories(vec![category])
}

fn sum_of_costs(row: &Row) -> f64 {
    row.actors().iter().map(|a| a.cost.value()).sum()
}

speculate! {
    before {
        let sheet = Sheet::seeded();
    }

    describe "seeded sheet" {
        it "holds one category, one row and one actor" {
            assert_eq!(sheet.len(), 1);
            let row = sheet.row(0, 0).expect("seeded row");
            assert_eq!(sheet.category(0).unwrap().rows.len(), 1);
            assert_eq!(row.actors().len(), 1);
            assert_eq!(row.criticality.value(), 5);
            assert_eq!(row.status, Status::Mandatory);
            assert_eq!(row.total_cost(), 100.0);
        }
    }

    describe "categories" {
        describe "add_category" {
            it "appends a default category after the existing ones" {
                let next = sheet.add_category();

                assert_eq!(next.len(), 2);
                assert_eq!(next.category(0), sheet.category(0));
                let added = next.category(1).unwrap();
                assert_eq!(added.title, DEFAULT_CATEGORY_TITLE);
                assert!(added.rows.is_empty());
            }
        }

        describe "delete_category" {
            it "shifts the following category down" {
                let two = sheet
                    .add_category()
                    .update_category_title(1, "Second")
                    .unwrap();

                let next = two.delete_category(0).unwrap();

                assert_eq!(next.len(), 1);
                assert_eq!(next.category(0).unwrap().title, "Second");
            }

            it "can empty the sheet" {
                let next = sheet.delete_category(0).unwrap();
                assert!(next.is_empty());
            }

            it "rejects an index past the end" {
                let err = sheet.delete_category(1).unwrap_err();
                assert_eq!(err, SheetError::IndexOutOfRange { level: Level::Category, index: 1, len: 1 });
            }
        }

        describe "update_category_title" {
            it "replaces the title only" {
                let next = sheet.update_category_title(0, "Billing").unwrap();
                let category = next.category(0).unwrap();
                assert_eq!(category.title, "Billing");
                assert_eq!(category.rows, sheet.category(0).unwrap().rows);
            }
        }
    }

    describe "rows" {
        describe "add_row" {
            it "adds a blank row to an empty category" {
                let next = sheet.add_category().add_row(1).unwrap();

                let rows = &next.category(1).unwrap().rows;
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].feature, "");
                assert_eq!(rows[0].description, "");
                assert_eq!(rows[0].criticality.value(), 0);
                assert_eq!(rows[0].status, Status::Mandatory);
                assert_eq!(rows[0].total_cost(), 0.0);
                assert!(rows[0].actors().is_empty());
            }

            it "appends after existing rows" {
                let next = sheet.add_row(0).unwrap();
                let rows = &next.category(0).unwrap().rows;
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].feature, "Create, Edit, Delete");
                assert_eq!(rows[1].feature, "");
            }

            it "rejects an unknown category" {
                assert!(sheet.add_row(5).is_err());
            }
        }

        describe "delete_row" {
            it "keeps the relative order of the remaining rows" {
                let three = sheet
                    .add_row(0)
                    .and_then(|s| s.update_row_field(0, 1, RowField::Feature("B".into())))
                    .and_then(|s| s.add_row(0))
                    .and_then(|s| s.update_row_field(0, 2, RowField::Feature("C".into())))
                    .unwrap();

                let next = three.delete_row(0, 1).unwrap();

                let features: Vec<&str> = next.category(0).unwrap().rows.iter().map(|r| r.feature.as_str()).collect();
                assert_eq!(features, vec!["Create, Edit, Delete", "C"]);
            }

            it "rejects an unknown row" {
                let err = sheet.delete_row(0, 1).unwrap_err();
                assert_eq!(err, SheetError::IndexOutOfRange { level: Level::Row, index: 1, len: 1 });
            }
        }

        describe "update_row_field" {
            it "sets each scalar field" {
                let next = sheet
                    .update_row_field(0, 0, RowField::Feature("Search".into()))
                    .and_then(|s| s.update_row_field(0, 0, RowField::Description("Full text".into())))
                    .and_then(|s| s.update_row_field(0, 0, RowField::Criticality(Criticality::new(2))))
                    .and_then(|s| s.update_row_field(0, 0, RowField::Status(Status::Optional)))
                    .unwrap();

                let row = next.row(0, 0).unwrap();
                assert_eq!(row.feature, "Search");
                assert_eq!(row.description, "Full text");
                assert_eq!(row.criticality.value(), 2);
                assert_eq!(row.status, Status::Optional);
            }

            it "leaves actors and total alone" {
                let next = sheet.update_row_field(0, 0, RowField::Feature("Other".into())).unwrap();
                let before = sheet.row(0, 0).unwrap();
                let after = next.row(0, 0).unwrap();
                assert_eq!(after.actors(), before.actors());
                assert_eq!(after.total_cost(), before.total_cost());
            }

            it "is idempotent" {
                let field = RowField::Description("same".into());
                let once = sheet.update_row_field(0, 0, field.clone()).unwrap();
                let twice = once.update_row_field(0, 0, field).unwrap();
                assert_eq!(once, twice);
            }
        }
    }

    describe "actors" {
        describe "add_actor" {
            it "appends a blank actor without changing the total" {
                let next = sheet.add_actor(0, 0).unwrap();
                let row = next.row(0, 0).unwrap();

                assert_eq!(row.actors().len(), 2);
                assert_eq!(row.actors()[0].name, "Developer");
                assert_eq!(row.actors()[1], Actor::default());
                assert_eq!(row.actors()[1].role, Role::Other);
                assert_eq!(row.total_cost(), 100.0);
            }
        }

        describe "update_actor_field" {
            it "recomputes the total after a cost change" {
                let start = sheet_with_costs(&[100.0]);

                let next = start.update_actor_field(0, 0, 0, ActorField::Cost(Cost::new(150.0))).unwrap();

                assert_eq!(next.row(0, 0).unwrap().total_cost(), 150.0);
            }

            it "treats an unparseable cost as zero" {
                let next = sheet.update_actor_field(0, 0, 0, ActorField::Cost(Cost::parse("lots"))).unwrap();
                assert_eq!(next.row(0, 0).unwrap().total_cost(), 0.0);
            }

            it "updates name and role" {
                let next = sheet
                    .update_actor_field(0, 0, 0, ActorField::Name("Ana".into()))
                    .and_then(|s| s.update_actor_field(0, 0, 0, ActorField::Role(Role::Design)))
                    .unwrap();
                let actor = &next.row(0, 0).unwrap().actors()[0];
                assert_eq!(actor.name, "Ana");
                assert_eq!(actor.role, Role::Design);
            }

            it "rejects an unknown actor" {
                let err = sheet.update_actor_field(0, 0, 3, ActorField::Name("x".into())).unwrap_err();
                assert_eq!(err, SheetError::IndexOutOfRange { level: Level::Actor, index: 3, len: 1 });
            }
        }

        describe "delete_actor" {
            it "removes the middle actor and recomputes the total" {
                let start = sheet_with_costs(&[10.0, 20.0, 30.0]);

                let next = start.delete_actor(0, 0, 1).unwrap();

                let row = next.row(0, 0).unwrap();
                let costs: Vec<f64> = row.actors().iter().map(|a| a.cost.value()).collect();
                assert_eq!(costs, vec![10.0, 30.0]);
                assert_eq!(row.total_cost(), 40.0);
            }

            it "can remove the last actor" {
                let next = sheet.delete_actor(0, 0, 0).unwrap();
                let row = next.row(0, 0).unwrap();
                assert!(row.actors().is_empty());
                assert_eq!(row.total_cost(), 0.0);
            }
        }

        describe "total cost invariant" {
            it "holds after any sequence of actor edits" {
                let mut current = sheet_with_costs(&[5.0]);
                let steps: Vec<Box<dyn Fn(&Sheet) -> Result<Sheet, SheetError>>> = vec![
                    Box::new(|s: &Sheet| s.add_actor(0, 0)),
                    Box::new(|s: &Sheet| s.update_actor_field(0, 0, 1, ActorField::Cost(Cost::new(12.5)))),
                    Box::new(|s: &Sheet| s.add_actor(0, 0)),
                    Box::new(|s: &Sheet| s.update_actor_field(0, 0, 2, ActorField::Cost(Cost::parse("7")))),
                    Box::new(|s: &Sheet| s.delete_actor(0, 0, 0)),
                    Box::new(|s: &Sheet| s.update_actor_field(0, 0, 0, ActorField::Cost(Cost::new(-3.0)))),
                    Box::new(|s: &Sheet| s.add_actor(0, 0)),
                ];

                for step in steps {
                    current = step(&current).unwrap();
                    let row = current.row(0, 0).unwrap();
                    assert_eq!(row.total_cost(), sum_of_costs(row));
                }
                assert_eq!(current.row(0, 0).unwrap().total_cost(), 7.0);
            }

            it "holds for a sheet read back from JSON with a stale total" {
                let json = r#"[{"title":"C","rows":[{"feature":"F","description":"","criticality":2,"status":"Optional","actors":[{"name":"a","role":"Dev","cost":10}],"total_cost":999}]}]"#;

                let loaded: Sheet = serde_json::from_str(json).unwrap();

                let row = loaded.row(0, 0).unwrap();
                assert_eq!(row.total_cost(), sum_of_costs(row));
                assert_eq!(row.total_cost(), 10.0);
            }
        }
    }

    describe "session" {
        it "keeps the snapshot when a strict edit fails" {
            let mut session = Session::new(sheet.clone(), true);
            assert!(session.apply(|s| s.add_actor(0, 4)).is_err());
            assert_eq!(session.sheet(), &sheet);
        }

        it "ignores stale indices when lenient" {
            let mut session = Session::new(sheet.clone(), false);
            let result = session.apply(|s| s.delete_actor(2, 0, 0)).unwrap();
            assert_eq!(result, sheet);
        }

        it "publishes each successful edit as the new snapshot" {
            let mut session = Session::new(sheet.clone(), true);
            let first = session.snapshot();
            session.apply(|s| s.add_row(0)).unwrap();
            session.apply(|s| s.add_actor(0, 1)).unwrap();

            assert_eq!(first, sheet);
            assert_eq!(session.sheet().row(0, 1).unwrap().actors().len(), 1);
        }
    }
}
