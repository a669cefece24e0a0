// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Authentication method resolution.
//!
//! A target carries a password, a private key file, or both:
//! - password only: password authentication
//! - key file only: public key authentication with an unencrypted key
//! - both: public key authentication, the password unlocks the key

use russh::client::{Handle, Handler};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use zeroize::Zeroizing;

use super::error::SshError;
use crate::target::Target;

/// A resolved authentication token, ready to present to the server.
#[derive(Clone)]
pub enum AuthMethod {
    Password(Zeroizing<String>),
    PrivateKey(Arc<russh::keys::PrivateKey>),
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMethod::Password(_) => f.write_str("Password(<redacted>)"),
            AuthMethod::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
        }
    }
}

/// Pick and load the authentication method for a target.
///
/// Runs before any network activity so bad credentials fail fast.
pub async fn resolve_auth_method(target: &Target) -> Result<AuthMethod, SshError> {
    if target.password.is_empty() && target.key_file.is_empty() {
        return Err(SshError::AuthConfig);
    }

    if target.key_file.is_empty() {
        return Ok(AuthMethod::Password(Zeroizing::new(target.password.clone())));
    }

    let path = PathBuf::from(&target.key_file);
    let pem = Zeroizing::new(tokio::fs::read_to_string(&path).await.map_err(|source| {
        SshError::KeyRead {
            path: path.clone(),
            source,
        }
    })?);

    let passphrase = (!target.password.is_empty()).then_some(target.password.as_str());
    let key = russh::keys::decode_secret_key(&pem, passphrase)
        .map_err(|source| SshError::KeyParse { path, source })?;

    Ok(AuthMethod::PrivateKey(Arc::new(key)))
}

/// This takes a handle and performs authentification with the given method.
pub async fn authenticate<H>(
    handle: &mut Handle<H>,
    username: &str,
    auth: AuthMethod,
) -> Result<(), SshError>
where
    H: Handler,
{
    let result = match auth {
        AuthMethod::Password(password) => {
            handle
                .authenticate_password(username, password.as_str())
                .await?
        }
        AuthMethod::PrivateKey(key) => {
            let hash_alg = handle.best_supported_rsa_hash().await?.flatten();
            handle
                .authenticate_publickey(
                    username,
                    russh::keys::PrivateKeyWithHashAlg::new(key, hash_alg),
                )
                .await?
        }
    };

    if !result.success() {
        return Err(SshError::AuthRejected {
            user: username.to_string(),
        });
    }
    Ok(())
}
