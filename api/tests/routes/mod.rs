mod accounts_test;
mod dashboard_test;
mod health_test;
mod tickets_test;
mod users_test;
