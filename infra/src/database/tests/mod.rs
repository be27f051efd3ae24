mod connection_tests;
mod mysql_repository_tests;
