pub mod env_var {
    use lazy_static::lazy_static;

    lazy_static! {
        static ref ENV_VAR: EnvVar = load_env();
    }

    const DEFAULT_DATABASE_POOL_SIZE: u32 = 5;

    #[derive(Debug, Clone)]
    pub struct EnvVar {
        pub port: u16,
        pub token_key: String,
        pub database_url: String,
        pub database_pool_size: u32,
    }

    macro_rules! get_env {
        ($env:literal) => {
            std::env::var($env).expect(concat!("Missing env var ", $env))
        };
    }

    fn load_env() -> EnvVar {
        let port: u16 = get_env!("PORT").parse().expect("Invalid PORT");
        let token_key = get_env!("TOKEN_KEY");
        let database_host = get_env!("DATABASE_HOST");
        let database_name = get_env!("DATABASE_NAME");
        let database_user = get_env!("DATABASE_USER");
        let database_password = get_env!("DATABASE_PASSWORD");
        let database_port: u16 = get_env!("DATABASE_PORT")
            .parse()
            .expect("Invalid DATABASE_PORT");
        let database_pool_size: u32 = match std::env::var("DATABASE_POOL_SIZE") {
            Ok(size) => size.parse().expect("Invalid DATABASE_POOL_SIZE"),
            Err(_) => DEFAULT_DATABASE_POOL_SIZE,
        };

        let database_url = format!("postgres://{database_user}:{database_password}@{database_host}:{database_port}/{database_name}");

        EnvVar {
            port,
            token_key,
            database_url,
            database_pool_size,
        }
    }

    pub fn get() -> &'static EnvVar {
        &ENV_VAR
    }
}
