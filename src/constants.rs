// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";

// YNAB API
pub const YNAB_API_BASE_URL: &str = "https://api.youneedabudget.com/v1/";
pub const YNAB_CREDENTIALS_NAME: &str = "ynabApi";
pub const YNAB_TOKEN_ENV: &str = "YNAB_PERSONAL_ACCESS_TOKEN";

// Node identity
pub const NODE_NAME: &str = "ynab";
pub const NODE_DISPLAY_NAME: &str = "YNAB";

// Load options methods
pub const LIST_BUDGETS_METHOD: &str = "listBudgets";
pub const LIST_ACCOUNTS_METHOD: &str = "listAccounts";

// Resources and operations
pub const RESOURCE_TRANSACTIONS: &str = "transactions";
pub const OPERATION_LIST: &str = "list";
pub const OPERATION_CREATE: &str = "create";

// Error messages
pub const ERR_SELECT_BUDGET: &str = "Select budget first";
