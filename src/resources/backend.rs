//! Backend configuration objects.
//!
//! A Backend holds a set of entries or virtual data. `local-db` backends are
//! created and deleted through the provider; every other kind ships with the
//! server and is only ever adopted.

use crate::model::{AttrSpec, DefaultValue, ObjectDefinition};
use crate::version::ProductVersion;

use super::{ConfigObjectDataSource, ConfigObjectListDataSource, ConfigObjectResource, ResourceMode};

const LOCAL_DB: &[&str] = &["local-db"];
const LOCAL_DB_AND_CHANGELOG: &[&str] = &["local-db", "changelog"];
const ALARM: &[&str] = &["alarm"];
const ALERT: &[&str] = &["alert"];
const CHANGELOG: &[&str] = &["changelog"];
const TASK: &[&str] = &["task"];
const SCHEMA: &[&str] = &["schema"];
const TRUST_STORE: &[&str] = &["trust-store"];
const CONFIG_FILE_HANDLER: &[&str] = &["config-file-handler"];
const METRICS: &[&str] = &["metrics"];

const WRITABILITY_MODES: &[&str] = &["enabled", "disabled", "internal-only"];
const CACHE_MODES: &[&str] = &["cache-keys-and-values", "cache-keys-only", "no-caching"];
const UNCACHED_CACHE_MODES: &[&str] = &["cache-keys-only", "no-caching"];
const PRIME_METHODS: &[&str] = &[
    "none",
    "preload",
    "cursor-across-indexes",
    "system-index-to-cursor-across-indexes",
    "system-index",
    "non-system-index",
    "dbcache",
];
const LOCK_BEHAVIORS: &[&str] = &[
    "acquire-before-retries",
    "acquire-after-retries",
    "acquire-before-initial-attempt",
    "no-lock",
];
const SINGLE_WRITER_LOCK_BEHAVIORS: &[&str] =
    &["never-acquire", "acquire-on-retry", "always-acquire"];
const VIRTUAL_ATTRIBUTE_INCLUSIONS: &[&str] = &[
    "add-attributes",
    "deleted-entry-attributes",
    "before-and-after-values",
    "key-attributes",
];
const EXCLUDED_ATTRIBUTE_REPORTING: &[&str] = &["none", "attribute-counts", "attribute-names"];

pub static BACKEND_TYPES: &[&str] = &[
    "local-db",
    "alarm",
    "alert",
    "changelog",
    "task",
    "schema",
    "trust-store",
    "custom",
    "config-file-handler",
    "metrics",
    "monitor",
];

static BACKEND_ATTRIBUTES: &[AttrSpec] = &[
    // Every backend type
    AttrSpec::string(
        "description",
        "description",
        "A description for this Backend",
    )
    .clearable(),
    AttrSpec::bool(
        "enabled",
        "enabled",
        "Indicates whether the backend is enabled in the server.",
    )
    .required_on_create(),
    AttrSpec::string_set(
        "base_dn",
        "baseDN",
        "Specifies the base DN(s) for the data that the backend handles.",
    )
    .required_on_create(),
    AttrSpec::enumeration(
        "writability_mode",
        "writabilityMode",
        WRITABILITY_MODES,
        "Specifies the behavior that the backend should use when processing write operations.",
    )
    .with_defaults(&[("local-db", DefaultValue::String("enabled"))]),
    AttrSpec::bool(
        "set_degraded_alert_when_disabled",
        "setDegradedAlertWhenDisabled",
        "Determines whether the Directory Server enters a DEGRADED state when this Backend is disabled.",
    )
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::bool(
        "return_unavailable_when_disabled",
        "returnUnavailableWhenDisabled",
        "Determines whether any LDAP operation that would use this Backend is to return UNAVAILABLE when this Backend is disabled.",
    )
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::string(
        "notification_manager",
        "notificationManager",
        "Specifies a notification manager for changes resulting from operations processed through this Backend",
    )
    .clearable(),
    AttrSpec::string(
        "backup_file_permissions",
        "backupFilePermissions",
        "Specifies the permissions that should be applied to files and directories created by a backup of the backend.",
    )
    .with_defaults(&[("local-db", DefaultValue::String("700"))]),
    AttrSpec::string(
        "java_class",
        "javaClass",
        "Specifies the fully-qualified name of the Java class that provides the backend implementation.",
    )
    .computed(),
    // local-db
    AttrSpec::enumeration(
        "uncached_id2entry_cache_mode",
        "uncachedId2entryCacheMode",
        UNCACHED_CACHE_MODES,
        "Specifies the cache mode that should be used when accessing the records in the uncached-id2entry database.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::String("cache-keys-only"))]),
    AttrSpec::string(
        "uncached_attribute_criteria",
        "uncachedAttributeCriteria",
        "The criteria that will be used to identify attributes that should be written into the uncached-id2entry database rather than the id2entry database.",
    )
    .for_types(LOCAL_DB)
    .clearable(),
    AttrSpec::string(
        "uncached_entry_criteria",
        "uncachedEntryCriteria",
        "The criteria that will be used to identify entries that should be written into the uncached-id2entry database rather than the id2entry database.",
    )
    .for_types(LOCAL_DB)
    .clearable(),
    AttrSpec::bool(
        "is_private_backend",
        "isPrivateBackend",
        "Indicates whether this backend should be considered a private backend in the server.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(false))]),
    AttrSpec::string(
        "db_directory",
        "dbDirectory",
        "Specifies the path to the filesystem directory that is used to hold the Berkeley DB Java Edition database files containing the data for this backend.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .with_defaults(&[("local-db", DefaultValue::String("db"))]),
    AttrSpec::string(
        "db_directory_permissions",
        "dbDirectoryPermissions",
        "Specifies the permissions that should be applied to the directory containing the backend database files and to directories and files created during backup or LDIF export of the backend.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .with_defaults(&[("local-db", DefaultValue::String("700"))]),
    AttrSpec::string_set(
        "compact_common_parent_dn",
        "compactCommonParentDN",
        "Provides a DN of an entry that may be the parent for a large number of entries in the backend.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::bool(
        "compress_entries",
        "compressEntries",
        "Indicates whether the backend should attempt to compress entries before storing them in the database.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(false))]),
    AttrSpec::bool(
        "hash_entries",
        "hashEntries",
        "Indicates whether to calculate and store a message digest of the entry contents along with the entry data, in order to provide a means of verifying the integrity of the entry data.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(false))]),
    AttrSpec::int64(
        "db_num_cleaner_threads",
        "dbNumCleanerThreads",
        "Specifies the number of threads that the backend should maintain to keep the database log files at or near the desired utilization.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .with_defaults(&[("local-db", DefaultValue::Int64(0))]),
    AttrSpec::int64(
        "db_cleaner_min_utilization",
        "dbCleanerMinUtilization",
        "Specifies the minimum percentage of \"live\" data that the database cleaner attempts to keep in database log files.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(75))]),
    AttrSpec::int64(
        "db_evictor_critical_percentage",
        "dbEvictorCriticalPercentage",
        "Specifies the percentage over the configured maximum that the database cache is allowed to grow.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(0))]),
    AttrSpec::string(
        "db_checkpointer_wakeup_interval",
        "dbCheckpointerWakeupInterval",
        "Specifies the maximum length of time that should pass between checkpoints.",
    )
    .for_types(LOCAL_DB)
    .pd_formatted()
    .with_defaults(&[("local-db", DefaultValue::String("1 m"))]),
    AttrSpec::string(
        "db_background_sync_interval",
        "dbBackgroundSyncInterval",
        "Specifies the interval to use when performing background synchronous writes in the database environment.",
    )
    .for_types(LOCAL_DB)
    .pd_formatted()
    .with_defaults(&[("local-db", DefaultValue::String("1 s"))]),
    AttrSpec::bool(
        "db_use_thread_local_handles",
        "dbUseThreadLocalHandles",
        "Indicates whether to use thread-local database handles to reduce contention in the backend.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::string(
        "db_log_file_max",
        "dbLogFileMax",
        "Specifies the maximum size for a database log file.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .pd_formatted()
    .with_defaults(&[("local-db", DefaultValue::String("50 mb"))]),
    AttrSpec::string(
        "db_logging_level",
        "dbLoggingLevel",
        "Specifies the log level that should be used by the database when it is writing information into the je.info file.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .with_defaults(&[("local-db", DefaultValue::String("CONFIG"))]),
    AttrSpec::int64(
        "db_cache_percent",
        "dbCachePercent",
        "Specifies the percentage of JVM memory to allocate to the database cache.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .with_defaults(&[("local-db", DefaultValue::Int64(10))]),
    AttrSpec::string(
        "db_cache_size",
        "dbCacheSize",
        "The amount of JVM memory to allocate to the database cache.",
    )
    .for_types(LOCAL_DB_AND_CHANGELOG)
    .pd_formatted(),
    AttrSpec::enumeration(
        "default_cache_mode",
        "defaultCacheMode",
        CACHE_MODES,
        "Specifies the cache mode that should be used for any database for which the cache mode has not been explicitly specified.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::String("cache-keys-and-values"))]),
    AttrSpec::enumeration(
        "id2entry_cache_mode",
        "id2entryCacheMode",
        CACHE_MODES,
        "Specifies the cache mode that should be used when accessing the records in the id2entry database.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::enumeration(
        "dn2id_cache_mode",
        "dn2idCacheMode",
        CACHE_MODES,
        "Specifies the cache mode that should be used when accessing the records in the dn2id database.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::enumeration(
        "id2children_cache_mode",
        "id2childrenCacheMode",
        CACHE_MODES,
        "Specifies the cache mode that should be used when accessing the records in the id2children database.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::enumeration(
        "id2subtree_cache_mode",
        "id2subtreeCacheMode",
        CACHE_MODES,
        "Specifies the cache mode that should be used when accessing the records in the id2subtree database.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::enumeration(
        "dn2uri_cache_mode",
        "dn2uriCacheMode",
        CACHE_MODES,
        "Specifies the cache mode that should be used when accessing the records in the dn2uri database.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::enum_set(
        "prime_method",
        "primeMethod",
        PRIME_METHODS,
        "Specifies the method that should be used to prime caches with data for this backend.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Set(&["none"]))]),
    AttrSpec::int64(
        "prime_thread_count",
        "primeThreadCount",
        "Specifies the number of threads to use when priming.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(2))]),
    AttrSpec::string(
        "prime_time_limit",
        "primeTimeLimit",
        "Specifies the maximum length of time that the backend prime should be allowed to run.",
    )
    .for_types(LOCAL_DB)
    .pd_formatted()
    .with_defaults(&[("local-db", DefaultValue::String("0 ms"))]),
    AttrSpec::bool(
        "prime_all_indexes",
        "primeAllIndexes",
        "Indicates whether to prime all indexes associated with this backend, or to only prime the specified set of indexes.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::string_set(
        "system_index_to_prime",
        "systemIndexToPrime",
        "Specifies which system index(es) should be primed when the backend is initialized.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::string_set(
        "system_index_to_prime_internal_nodes_only",
        "systemIndexToPrimeInternalNodesOnly",
        "Specifies the system index(es) for which internal database nodes only should be primed when the backend is initialized.",
    )
    .for_types(LOCAL_DB),
    AttrSpec::bool(
        "background_prime",
        "backgroundPrime",
        "Indicates whether to attempt to perform the prime using a background thread if possible.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(false))]),
    AttrSpec::int64(
        "index_entry_limit",
        "indexEntryLimit",
        "Specifies the maximum number of entries that are allowed to match a given index key before that particular index key is no longer maintained.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(4000))]),
    AttrSpec::int64(
        "composite_index_entry_limit",
        "compositeIndexEntryLimit",
        "Specifies the maximum number of entry IDs to maintain for each entry in a composite index key.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(100000))]),
    AttrSpec::int64(
        "id2children_index_entry_limit",
        "id2childrenIndexEntryLimit",
        "Specifies the maximum number of entry IDs to maintain for each entry in the id2children system index.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(66))]),
    AttrSpec::int64(
        "id2subtree_index_entry_limit",
        "id2subtreeIndexEntryLimit",
        "Specifies the maximum number of entry IDs to maintain for each entry in the id2subtree system index.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(500000))]),
    AttrSpec::string(
        "import_temp_directory",
        "importTempDirectory",
        "Specifies the location of the directory that is used to hold temporary information during indexing as part of an LDIF import.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::String("import-tmp"))]),
    AttrSpec::int64(
        "import_thread_count",
        "importThreadCount",
        "Specifies the number of threads to use for concurrent processing during an LDIF import.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(16))]),
    AttrSpec::int64(
        "export_thread_count",
        "exportThreadCount",
        "Specifies the number of threads to use for concurrently retrieving and encoding entries during an LDIF export.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(0))]),
    AttrSpec::int64(
        "db_import_cache_percent",
        "dbImportCachePercent",
        "The percentage of JVM memory to allocate to the database cache during import operations.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(60))]),
    AttrSpec::bool(
        "db_txn_write_no_sync",
        "dbTxnWriteNoSync",
        "Indicates whether the database should synchronously flush data as it is written to disk.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::int64(
        "deadlock_retry_limit",
        "deadlockRetryLimit",
        "Specifies the number of times that the server should retry an attempted operation in the backend if a deadlock results from two concurrent requests that interfere with each other in a conflicting manner.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(10))]),
    AttrSpec::enumeration(
        "external_txn_default_backend_lock_behavior",
        "externalTxnDefaultBackendLockBehavior",
        LOCK_BEHAVIORS,
        "Specifies the default behavior that should be exhibited by external transactions (e.g., an LDAP transaction or an atomic multi-update operation) with regard to acquiring an exclusive lock in this backend.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::String("acquire-before-retries"))]),
    AttrSpec::enumeration(
        "single_writer_lock_behavior",
        "singleWriterLockBehavior",
        SINGLE_WRITER_LOCK_BEHAVIORS,
        "Specifies the condition under which to acquire a single-writer lock to ensure that the associated operation will be the only write in progress at the time the lock is held.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::String("acquire-on-retry"))]),
    AttrSpec::int64(
        "subtree_delete_size_limit",
        "subtreeDeleteSizeLimit",
        "Specifies the maximum number of entries that may be deleted from the backend when using the subtree delete control.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(5000))]),
    AttrSpec::int64(
        "num_recent_changes",
        "numRecentChanges",
        "Specifies the number of recent LDAP entry changes per replica for which the backend keeps a record to allow replication to recover in the event that the server is abruptly terminated.",
    )
    .for_types(LOCAL_DB)
    .with_defaults(&[("local-db", DefaultValue::Int64(50000))]),
    AttrSpec::string(
        "offline_process_database_open_timeout",
        "offlineProcessDatabaseOpenTimeout",
        "Specifies a timeout duration which will be used for opening the database environment by an offline process, such as export-ldif.",
    )
    .for_types(LOCAL_DB)
    .pd_formatted()
    .with_defaults(&[("local-db", DefaultValue::String("1 h"))]),
    AttrSpec::bool(
        "set_degraded_alert_for_untrusted_index",
        "setDegradedAlertForUntrustedIndex",
        "Determines whether the Directory Server enters a DEGRADED state (and sends a corresponding alert) when this Backend has an untrusted index.",
    )
    .for_types(LOCAL_DB)
    .since(ProductVersion::V9_2_0_0)
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::bool(
        "return_unavailable_for_untrusted_index",
        "returnUnavailableForUntrustedIndex",
        "Determines whether the Directory Server returns UNAVAILABLE for any LDAP search operation in this Local DB Backend that would use an untrusted index.",
    )
    .for_types(LOCAL_DB)
    .since(ProductVersion::V9_2_0_0)
    .with_defaults(&[("local-db", DefaultValue::Bool(true))]),
    AttrSpec::bool(
        "process_filters_with_undefined_attribute_types",
        "processFiltersWithUndefinedAttributeTypes",
        "Determines whether the Directory Server should continue filter processing for LDAP search operations in this Local DB Backend that includes a search filter with an attribute that is not defined in the schema.",
    )
    .for_types(LOCAL_DB)
    .since(ProductVersion::V9_2_0_0)
    .with_defaults(&[("local-db", DefaultValue::Bool(false))]),
    // alarm
    AttrSpec::string(
        "alarm_retention_time",
        "alarmRetentionTime",
        "Specifies the maximum length of time that information about raised alarms should be maintained before they will be purged.",
    )
    .for_types(ALARM)
    .pd_formatted(),
    AttrSpec::int64(
        "max_alarms",
        "maxAlarms",
        "Specifies the maximum number of alarms that should be retained. If more alarms than this configured maximum are generated within the alarm retention time, then the oldest alarms will be purged to achieve this maximum. Only alarms at normal severity will be purged.",
    )
    .for_types(ALARM),
    // alert
    AttrSpec::string(
        "alert_retention_time",
        "alertRetentionTime",
        "Specifies the maximum length of time that information about generated alerts should be maintained before they will be purged.",
    )
    .for_types(ALERT)
    .pd_formatted(),
    AttrSpec::int64(
        "max_alerts",
        "maxAlerts",
        "Specifies the maximum number of alerts that should be retained. If more alerts than this configured maximum are generated within the alert retention time, then the oldest alerts will be purged to achieve this maximum.",
    )
    .for_types(ALERT),
    AttrSpec::string_set(
        "disabled_alert_type",
        "disabledAlertType",
        "Specifies the names of the alert types that should not be added to the backend.",
    )
    .for_types(ALERT),
    // changelog
    AttrSpec::string(
        "changelog_maximum_age",
        "changelogMaximumAge",
        "Changes are guaranteed to be maintained in the changelog database for at least this duration.",
    )
    .for_types(CHANGELOG)
    .pd_formatted(),
    AttrSpec::string(
        "target_database_size",
        "targetDatabaseSize",
        "The changelog database is allowed to grow up to this size on disk even if changes are older than the configured changelog-maximum-age.",
    )
    .for_types(CHANGELOG)
    .pd_formatted(),
    AttrSpec::string_set(
        "changelog_entry_include_base_dn",
        "changelogEntryIncludeBaseDN",
        "The base DNs for branches in the data for which to record changes in the changelog.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_entry_exclude_base_dn",
        "changelogEntryExcludeBaseDN",
        "The base DNs for branches in the data for which no changelog records should be generated.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_entry_include_filter",
        "changelogEntryIncludeFilter",
        "A filter that indicates which changelog entries should actually be stored in the changelog.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_entry_exclude_filter",
        "changelogEntryExcludeFilter",
        "A filter that indicates which changelog entries should be excluded from the changelog.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_include_attribute",
        "changelogIncludeAttribute",
        "Specifies a set of attribute types that should be included in a changelog entry for ADD and MODIFY operations.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_exclude_attribute",
        "changelogExcludeAttribute",
        "Specifies a set of attribute types that should be excluded in a changelog entry for ADD and MODIFY operations.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_deleted_entry_include_attribute",
        "changelogDeletedEntryIncludeAttribute",
        "Specifies a set of attribute types that should be included in a changelog entry for DELETE operations.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_deleted_entry_exclude_attribute",
        "changelogDeletedEntryExcludeAttribute",
        "Specifies a set of attribute types that should be excluded in a changelog entry for DELETE operations.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "changelog_include_key_attribute",
        "changelogIncludeKeyAttribute",
        "Specifies which attribute types will be included in a changelog entry for MODIFY and MODIFY_DN operations.",
    )
    .for_types(CHANGELOG),
    AttrSpec::int64(
        "changelog_max_before_after_values",
        "changelogMaxBeforeAfterValues",
        "This controls whether all attribute values for a modified attribute (even those values that have not changed) will be included in the changelog entry.",
    )
    .for_types(CHANGELOG),
    AttrSpec::int64(
        "changelog_write_batch_size",
        "changelogWriteBatchSize",
        "Specifies the number of changelog entries written in a single database transaction.",
    )
    .for_types(CHANGELOG),
    AttrSpec::int64(
        "changelog_purge_batch_size",
        "changelogPurgeBatchSize",
        "Specifies the number of changelog entries purged in a single database transaction.",
    )
    .for_types(CHANGELOG),
    AttrSpec::int64(
        "changelog_write_queue_capacity",
        "changelogWriteQueueCapacity",
        "Specifies the capacity of the changelog write queue in number of changes.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "index_include_attribute",
        "indexIncludeAttribute",
        "Specifies which attribute types are to be specifically included in the set of attribute indexes for searches.",
    )
    .for_types(CHANGELOG),
    AttrSpec::string_set(
        "index_exclude_attribute",
        "indexExcludeAttribute",
        "Specifies which attribute types are to be specifically excluded from the set of attribute indexes for searches.",
    )
    .for_types(CHANGELOG),
    AttrSpec::bool(
        "write_lastmod_attributes",
        "writeLastmodAttributes",
        "Specifies whether values of creatorsName, createTimestamp, modifiersName and modifyTimestamp attributes will be written to changelog entries.",
    )
    .for_types(CHANGELOG),
    AttrSpec::bool(
        "use_reversible_form",
        "useReversibleForm",
        "Specifies whether the changelog should provide enough information to be able to revert the changes if desired.",
    )
    .for_types(CHANGELOG),
    AttrSpec::enum_set(
        "include_virtual_attributes",
        "includeVirtualAttributes",
        VIRTUAL_ATTRIBUTE_INCLUSIONS,
        "Specifies the changelog entry elements (if any) in which virtual attributes should be included.",
    )
    .for_types(CHANGELOG),
    AttrSpec::bool(
        "apply_access_controls_to_changelog",
        "applyAccessControlsToChangelog",
        "Indicates whether the contents of changelog entries should be subject to access control and sensitive attribute evaluation such that the contents of attributes like changes, deletedEntryAttrs, ds-changelog-entry-key-attr-values, ds-changelog-before-values, and ds-changelog-after-values may be altered based on attributes the user can see in the target entry.",
    )
    .for_types(CHANGELOG),
    AttrSpec::enumeration(
        "report_excluded_changelog_attributes",
        "reportExcludedChangelogAttributes",
        EXCLUDED_ATTRIBUTE_REPORTING,
        "Indicates whether changelog entries that have been altered by applying access controls should include additional information about any attributes that may have been removed.",
    )
    .for_types(CHANGELOG),
    // task
    AttrSpec::string(
        "task_backing_file",
        "taskBackingFile",
        "Specifies the path to the backing file for storing information about the tasks configured in the server.",
    )
    .for_types(TASK),
    AttrSpec::int64(
        "maximum_initial_task_log_messages_to_retain",
        "maximumInitialTaskLogMessagesToRetain",
        "The maximum number of log messages to retain in each task entry from the beginning of the processing for that task.",
    )
    .for_types(TASK),
    AttrSpec::int64(
        "maximum_final_task_log_messages_to_retain",
        "maximumFinalTaskLogMessagesToRetain",
        "The maximum number of log messages to retain in each task entry from the end of the processing for that task.",
    )
    .for_types(TASK),
    AttrSpec::string(
        "task_retention_time",
        "taskRetentionTime",
        "Specifies the length of time that task entries should be retained after processing on the associated task has been completed.",
    )
    .for_types(TASK)
    .pd_formatted(),
    AttrSpec::string(
        "notification_sender_address",
        "notificationSenderAddress",
        "Specifies the email address to use as the sender address (that is, the \"From:\" address) for notification mail messages generated when a task completes execution.",
    )
    .for_types(TASK),
    // schema
    AttrSpec::string_set(
        "schema_entry_dn",
        "schemaEntryDN",
        "Defines the base DNs of the subtrees in which the schema information is published in addition to the value included in the base-dn property.",
    )
    .for_types(SCHEMA),
    AttrSpec::bool(
        "show_all_attributes",
        "showAllAttributes",
        "Indicates whether to treat all attributes in the schema entry as if they were user attributes regardless of their configuration.",
    )
    .for_types(SCHEMA),
    AttrSpec::string_set(
        "read_only_schema_file",
        "readOnlySchemaFile",
        "Specifies the name of a file (which must exist in the config/schema directory) containing schema elements that should be considered read-only.",
    )
    .for_types(SCHEMA),
    // trust-store
    AttrSpec::string(
        "trust_store_file",
        "trustStoreFile",
        "Specifies the path to the file that stores the trust information.",
    )
    .for_types(TRUST_STORE),
    AttrSpec::string(
        "trust_store_type",
        "trustStoreType",
        "Specifies the format for the data in the key store file.",
    )
    .for_types(TRUST_STORE),
    AttrSpec::string(
        "trust_store_pin",
        "trustStorePin",
        "Specifies the clear-text PIN needed to access the Trust Store Backend.",
    )
    .for_types(TRUST_STORE)
    .sensitive(),
    AttrSpec::string(
        "trust_store_pin_file",
        "trustStorePinFile",
        "Specifies the path to the text file whose only contents should be a single line containing the clear-text PIN needed to access the Trust Store Backend.",
    )
    .for_types(TRUST_STORE),
    AttrSpec::string(
        "trust_store_pin_passphrase_provider",
        "trustStorePinPassphraseProvider",
        "The passphrase provider to use to obtain the clear-text PIN needed to access the Trust Store Backend.",
    )
    .for_types(TRUST_STORE),
    // config-file-handler
    AttrSpec::string_set(
        "insignificant_config_archive_attribute",
        "insignificantConfigArchiveAttribute",
        "The name or OID of an attribute type that is considered insignificant for the purpose of maintaining the configuration archive.",
    )
    .for_types(CONFIG_FILE_HANDLER),
    AttrSpec::string_set(
        "insignificant_config_archive_base_dn",
        "insignificantConfigArchiveBaseDN",
        "The base DN that is considered insignificant for the purpose of maintaining the configuration archive.",
    )
    .for_types(CONFIG_FILE_HANDLER),
    AttrSpec::bool(
        "maintain_config_archive",
        "maintainConfigArchive",
        "Indicates whether the server should maintain the config archive with new changes to the config backend.",
    )
    .for_types(CONFIG_FILE_HANDLER),
    AttrSpec::int64(
        "max_config_archive_count",
        "maxConfigArchiveCount",
        "Indicates the maximum number of previous config files to keep as part of maintaining the config archive.",
    )
    .for_types(CONFIG_FILE_HANDLER),
    AttrSpec::string(
        "mirrored_subtree_peer_polling_interval",
        "mirroredSubtreePeerPollingInterval",
        "Tells the server component that is responsible for mirroring configuration data across a topology of servers the maximum amount of time to wait before polling the peer servers in the topology to determine if there are any changes in the topology.",
    )
    .for_types(CONFIG_FILE_HANDLER)
    .pd_formatted(),
    AttrSpec::string(
        "mirrored_subtree_entry_update_timeout",
        "mirroredSubtreeEntryUpdateTimeout",
        "Tells the server component that is responsible for mirroring configuration data across a topology of servers the maximum amount of time to wait for an update operation (add, delete, modify and modify-dn) on an entry to be applied on all servers in the topology.",
    )
    .for_types(CONFIG_FILE_HANDLER)
    .pd_formatted(),
    AttrSpec::string(
        "mirrored_subtree_search_timeout",
        "mirroredSubtreeSearchTimeout",
        "Tells the server component that is responsible for mirroring configuration data across a topology of servers the maximum amount of time to wait for a search operation to complete.",
    )
    .for_types(CONFIG_FILE_HANDLER)
    .pd_formatted(),
    // metrics
    AttrSpec::string(
        "storage_dir",
        "storageDir",
        "Specifies the path to the directory where metric data is stored.",
    )
    .for_types(METRICS),
    AttrSpec::string(
        "metrics_dir",
        "metricsDir",
        "Specifies the path to the directory that contains the metric definitions.",
    )
    .for_types(METRICS),
    AttrSpec::string(
        "sample_flush_interval",
        "sampleFlushInterval",
        "Period when samples are flushed to disk.",
    )
    .for_types(METRICS)
    .pd_formatted(),
    AttrSpec::string_set(
        "retention_policy",
        "retentionPolicy",
        "The retention policy to use for the Metrics Backend.",
    )
    .for_types(METRICS),
];

/// The Backend object kind.
pub static BACKEND: ObjectDefinition = ObjectDefinition {
    object_name: "backend",
    display_name: "Backend",
    collection: "backends",
    identifier: AttrSpec::string("backend_id", "backendID", "Name of the Backend").identifier(),
    types: BACKEND_TYPES,
    attributes: BACKEND_ATTRIBUTES,
};

/// `pingdirectory_backend`: creates and deletes `local-db` backends.
pub fn backend_resource() -> ConfigObjectResource {
    ConfigObjectResource::new(
        "pingdirectory_backend",
        &BACKEND,
        ResourceMode::Creatable { types: LOCAL_DB },
    )
}

/// `pingdirectory_default_backend`: adopts backends that ship with the server.
pub fn default_backend_resource() -> ConfigObjectResource {
    ConfigObjectResource::new(
        "pingdirectory_default_backend",
        &BACKEND,
        ResourceMode::EditOnly,
    )
}

pub fn backend_data_source() -> ConfigObjectDataSource {
    ConfigObjectDataSource::new("pingdirectory_backend", &BACKEND)
}

pub fn backends_data_source() -> ConfigObjectListDataSource {
    ConfigObjectListDataSource::new("pingdirectory_backends", &BACKEND)
}
