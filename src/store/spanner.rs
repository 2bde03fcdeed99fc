use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::mutation::insert;
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::filter::Match;
use super::{Collection, Document, DocumentStore, Filter, StoreError, bounded};
use crate::config::Config;

/// Fully qualified location of a Spanner database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannerTarget {
    pub project: String,
    pub instance: String,
    pub database: String,
}

impl SpannerTarget {
    /// Parse `projects/P/instances/I/databases/D`.
    pub fn parse(path: &str) -> Result<Self> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            ["projects", project, "instances", instance, "databases", database]
                if !project.is_empty() && !instance.is_empty() && !database.is_empty() =>
            {
                Ok(SpannerTarget {
                    project: project.to_string(),
                    instance: instance.to_string(),
                    database: database.to_string(),
                })
            }
            _ => bail!("Spanner path must look like projects/P/instances/I/databases/D"),
        }
    }

    fn project_path(&self) -> String {
        format!("projects/{}", self.project)
    }

    fn instance_path(&self) -> String {
        format!("{}/instances/{}", self.project_path(), self.instance)
    }

    fn database_path(&self) -> String {
        format!("{}/databases/{}", self.instance_path(), self.database)
    }
}

/// Document store backed by Google Cloud Spanner.
///
/// Each collection is a table of `(id, data JSON, created_at)` rows. Filters
/// are pushed down as `JSON_VALUE` comparisons.
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
    database: String,
    timeout: Duration,
}

impl SpannerStore {
    /// Connect to the target database, provisioning it first if needed.
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST on its own
    /// and talks to the emulator when it is set.
    pub async fn connect(target: &SpannerTarget, config: &Config) -> Result<Self> {
        auto_provision(target, config).await?;

        let database_path = target.database_path();

        match config.spanner_emulator_host.as_deref() {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
            database: target.database.clone(),
            timeout: config.store_timeout,
        })
    }

    async fn insert_row(&self, collection: Collection, data: JsonValue) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let data_str = serde_json::to_string(&data)
            .context("Failed to serialize JSON data")?;

        let mutation = insert(
            collection.name(),
            &["id", "data", "created_at"],
            &[&id, &data_str, &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to insert document into Spanner")?;

        tracing::debug!("Inserted document with id: {} into {}", id, collection);
        Ok(id)
    }

    async fn query_rows(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let (sql, params) = find_sql(collection, filter, limit);

        let mut statement = Statement::new(&sql);
        for (name, value) in &params {
            statement.add_param(name, value);
        }

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query documents from Spanner")?;

        let mut documents = Vec::new();
        while let Some(row) = result_set.next().await? {
            let id: String = row.column_by_name("id")?;
            let data_str: String = row.column_by_name("data")?;
            let data: JsonValue = serde_json::from_str(&data_str)
                .context("Failed to deserialize JSON data")?;
            documents.push(Document { id, data });
        }

        Ok(documents)
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        let statement = Statement::new(
            "SELECT table_name FROM information_schema.tables WHERE table_schema = '' ORDER BY table_name",
        );

        let mut tx = self.inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to list tables")?;

        let mut names = Vec::new();
        while let Some(row) = result_set.next().await? {
            names.push(row.column_by_name::<String>("table_name")?);
        }
        Ok(names)
    }
}

#[async_trait]
impl DocumentStore for SpannerStore {
    async fn insert(&self, collection: Collection, data: JsonValue) -> Result<String, StoreError> {
        bounded(self.timeout, "insert", self.insert_row(collection, data)).await
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        bounded(self.timeout, "find", self.query_rows(collection, filter, limit)).await
    }

    fn name(&self) -> Option<&str> {
        Some(&self.database)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        bounded(self.timeout, "list_collections", self.table_names()).await
    }
}

/// Build the query for a filtered find, returning the SQL and its parameters.
///
/// Field names come from the fixed schema, never from request input; only the
/// match values are bound as parameters.
fn find_sql(collection: Collection, filter: &Filter, limit: usize) -> (String, Vec<(String, String)>) {
    let mut sql = format!(
        "SELECT id, TO_JSON_STRING(data) AS data FROM {}",
        collection.name()
    );
    let mut params = Vec::new();

    for (i, condition) in filter.conditions().iter().enumerate() {
        let param = format!("p{}", i);
        let field = format!("JSON_VALUE(data, '$.{}')", condition.field);
        let clause = match &condition.matcher {
            Match::Contains(text) => {
                params.push((param.clone(), Match::case_insensitive_pattern(text)));
                format!("REGEXP_CONTAINS({}, @{})", field, param)
            }
            Match::Exact(text) => {
                params.push((param.clone(), text.clone()));
                format!("{} = @{}", field, param)
            }
        };
        sql.push_str(if i == 0 { " WHERE " } else { " AND " });
        sql.push_str(&clause);
    }

    if limit > 0 {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    (sql, params)
}

fn create_table_ddl(collection: Collection) -> String {
    format!(
        r#"CREATE TABLE {} (
    id STRING(36) NOT NULL,
    data JSON NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)"#,
        collection.name()
    )
}

/// Automatically provision the Spanner instance, database, and collection tables
///
/// Checks whether each resource exists and creates the missing ones, so local
/// development against the emulator needs no setup.
async fn auto_provision(target: &SpannerTarget, config: &Config) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    ensure_instance_exists(&admin_client, target, config).await?;
    ensure_database_exists(&admin_client, target).await?;
    ensure_tables_exist(&admin_client, target).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Run `create` when `lookup` reported the resource as missing.
async fn ensure_exists<C, Fut>(
    kind: &str,
    path: &str,
    lookup: Result<(), Status>,
    create: C,
) -> Result<()>
where
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match lookup {
        Ok(()) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            create().await?;
            tracing::info!("{} created: {}", kind, path);
            Ok(())
        }
        Err(status) => Err(anyhow!(
            "Failed to check {} existence: {}",
            kind.to_lowercase(),
            status.message()
        )),
    }
}

async fn ensure_instance_exists(
    admin_client: &AdminClient,
    target: &SpannerTarget,
    config: &Config,
) -> Result<()> {
    let project_path = target.project_path();
    let instance_path = target.instance_path();

    let lookup = admin_client
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.clone(),
                field_mask: None,
            },
            None,
        )
        .await
        .map(|_| ());

    let instance_config = match config.spanner_emulator_host {
        Some(_) => format!("{}/instanceConfigs/emulator-config", project_path),
        None => format!("{}/instanceConfigs/regional-us-central1", project_path),
    };
    let request = CreateInstanceRequest {
        parent: project_path,
        instance_id: target.instance.clone(),
        instance: Some(Instance {
            name: instance_path.clone(),
            config: instance_config,
            display_name: format!("{} kittens", target.instance),
            node_count: 1,
            ..Default::default()
        }),
    };

    ensure_exists("Instance", &instance_path, lookup, || async move {
        let mut operation = admin_client
            .instance()
            .create_instance(request, None)
            .await
            .context("Failed to start instance creation")?;
        operation.wait(None).await.context("Failed to create instance")?;
        Ok::<_, anyhow::Error>(())
    })
    .await
}

async fn ensure_database_exists(admin_client: &AdminClient, target: &SpannerTarget) -> Result<()> {
    let database_path = target.database_path();

    let lookup = admin_client
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.clone(),
            },
            None,
        )
        .await
        .map(|_| ());

    let request = CreateDatabaseRequest {
        parent: target.instance_path(),
        create_statement: format!("CREATE DATABASE `{}`", target.database),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: 1, // GoogleSQL
        proto_descriptors: vec![],
    };

    ensure_exists("Database", &database_path, lookup, || async move {
        let mut operation = admin_client
            .database()
            .create_database(request, None)
            .await
            .context("Failed to start database creation")?;
        operation.wait(None).await.context("Failed to create database")?;
        Ok::<_, anyhow::Error>(())
    })
    .await
}

/// Create any collection table missing from the database DDL, in one batch.
async fn ensure_tables_exist(admin_client: &AdminClient, target: &SpannerTarget) -> Result<()> {
    let database_path = target.database_path();

    let ddl_response = admin_client
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database_path.clone(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?;

    let existing = ddl_response.into_inner().statements;
    let missing: Vec<Collection> = Collection::ALL
        .into_iter()
        .filter(|collection| !table_declared(&existing, collection.name()))
        .collect();

    if missing.is_empty() {
        tracing::info!("All collection tables already exist");
        return Ok(());
    }

    tracing::info!(
        "Creating collection tables: {}",
        missing.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    );

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path,
        statements: missing.into_iter().map(create_table_ddl).collect(),
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create tables")?;

    tracing::info!("Collection tables created successfully");
    Ok(())
}

fn table_declared(statements: &[String], table: &str) -> bool {
    let plain = format!("CREATE TABLE {} (", table);
    let quoted = format!("CREATE TABLE `{}` (", table);
    statements
        .iter()
        .any(|stmt| stmt.contains(&plain) || stmt.contains(&quoted))
}
