mod custom_search;
mod health_check;
